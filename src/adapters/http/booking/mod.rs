//! HTTP adapter for booking and upsell endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AddUpsellRequest, AddUpsellResponse, BookingListResponse, BookingResponse,
    CostEstimateResponse, CreateBookingRequest, ErrorResponse, ListBookingsQuery, OverrideQuery,
    TotalsResponse, TransitionStatusRequest, UpdateBookingRequest, UpdateBookingResponse,
    UpdateUpsellRequest, UpsellResponse,
};
pub use handlers::BookingHandlers;
pub use routes::booking_routes;
