pub mod booking_ledger;

// パブリックに型を再エクスポート
pub use booking_ledger::BookingLedger as PostgresBookingLedger;
