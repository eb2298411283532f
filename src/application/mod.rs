//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Booking handlers
    CreateBookingCommand, CreateBookingHandler, CreateBookingResult,
    GetBookingHandler, GetBookingQuery,
    ListBookingsHandler, ListBookingsQuery,
    TransitionStatusCommand, TransitionStatusHandler, TransitionStatusResult,
    UpdateBookingCommand, UpdateBookingHandler, UpdateBookingResult,
    // Upsell handlers
    AddUpsellCommand, AddUpsellHandler, AddUpsellResult,
    RemoveUpsellCommand, RemoveUpsellHandler, RemoveUpsellResult,
    UpdateUpsellCommand, UpdateUpsellHandler, UpdateUpsellResult,
};
