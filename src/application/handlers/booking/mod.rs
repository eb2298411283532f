//! Booking command and query handlers.

mod create_booking;
mod get_booking;
mod list_bookings;
mod transition_status;
mod update_booking;

pub use create_booking::{CreateBookingCommand, CreateBookingHandler, CreateBookingResult};
pub use get_booking::{GetBookingHandler, GetBookingQuery};
pub use list_bookings::{ListBookingsHandler, ListBookingsQuery};
pub use transition_status::{
    TransitionStatusCommand, TransitionStatusHandler, TransitionStatusResult,
};
pub use update_booking::{UpdateBookingCommand, UpdateBookingHandler, UpdateBookingResult};
