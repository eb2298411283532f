//! HTTP routes for booking endpoints.

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use super::handlers::{
    add_upsell, create_booking, get_booking, list_bookings, remove_upsell, transition_status,
    update_booking, update_upsell, BookingHandlers,
};

/// Creates the booking router. Mount it under `/api/bookings`.
pub fn booking_routes(handlers: BookingHandlers) -> Router {
    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/:id", get(get_booking).put(update_booking))
        .route("/:id/status", patch(transition_status))
        .route("/:id/upsells", post(add_upsell))
        .route(
            "/:id/upsells/:upsell_id",
            put(update_upsell).delete(remove_upsell),
        )
        .with_state(handlers)
}
