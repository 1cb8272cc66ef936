pub mod booking_ledger;
pub mod item_service;
pub mod user_service;

pub use booking_ledger::BookingLedger;
pub use item_service::{ItemService, ItemSnapshot};
pub use user_service::{UserService, UserSnapshot};
