use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_booking, decide_booking, get_booking, get_comment_eligibility,
    get_item_availability, list_booker_bookings, list_owner_availability, list_owner_bookings,
};

/// Creates the API router with all booking endpoints
///
/// Command endpoints:
/// - POST /bookings - Request a booking
/// - PATCH /bookings/:id?approved= - Approve or reject a booking
///
/// Query endpoints:
/// - GET /bookings/:id - Get booking details
/// - GET /bookings - List the caller's bookings
/// - GET /bookings/owner - List bookings of the caller's items
/// - GET /items/availability - Last/next booking of every owned item
/// - GET /items/:id/availability - Last/next booking of one item
/// - GET /items/:id/comment-eligibility - Whether the caller may comment
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/bookings", post(create_booking).get(list_booker_bookings))
        .route("/bookings/owner", get(list_owner_bookings))
        .route("/bookings/:id", get(get_booking).patch(decide_booking))
        .route("/items/availability", get(list_owner_availability))
        .route("/items/:id/availability", get(get_item_availability))
        .route(
            "/items/:id/comment-eligibility",
            get(get_comment_eligibility),
        )
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
