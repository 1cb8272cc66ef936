pub mod availability;
pub mod booking;
pub mod commands;
pub mod errors;
pub mod query;
pub mod value_objects;

pub use availability::AvailabilitySummary;
pub use booking::{Booking, BookingStatus};
pub use errors::*;
pub use query::BookingCategory;
pub use value_objects::*;
