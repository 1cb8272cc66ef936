mod availability;
mod booking_queries;
mod booking_service;
mod errors;

pub use availability::{
    ensure_can_comment, has_completed_booking, summaries_for_owner, summarize, summary_for_viewer,
};
pub use booking_queries::{list_bookings_by_booker, list_bookings_by_owner};
pub use booking_service::{ServiceDependencies, create_booking, decide_booking, get_booking};
pub use errors::{BookingApplicationError, ErrorKind, Result};
