pub mod booking_ledger;

pub use booking_ledger::BookingLedger as InMemoryBookingLedger;
