//! HTTP adapters - REST API implementations.
//!
//! - `booking` - Booking and upsell endpoints
//! - `middleware` - Bearer token authentication
//! - `router` - Router assembly and tower-http layers

pub mod booking;
pub mod middleware;
mod router;

pub use booking::{booking_routes, BookingHandlers};
pub use router::{api_router, with_http_layers};
