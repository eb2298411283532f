//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod booking;
pub mod upsell;

#[cfg(test)]
pub(crate) mod test_support;

pub use booking::{
    CreateBookingCommand, CreateBookingHandler, CreateBookingResult, GetBookingHandler,
    GetBookingQuery, ListBookingsHandler, ListBookingsQuery, TransitionStatusCommand,
    TransitionStatusHandler, TransitionStatusResult, UpdateBookingCommand, UpdateBookingHandler,
    UpdateBookingResult,
};
pub use upsell::{
    AddUpsellCommand, AddUpsellHandler, AddUpsellResult, RemoveUpsellCommand,
    RemoveUpsellHandler, RemoveUpsellResult, UpdateUpsellCommand, UpdateUpsellHandler,
    UpdateUpsellResult,
};
