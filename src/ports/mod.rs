//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `BookingRepository` - Booking persistence (write side)
//! - `BookingReader` - Booking listing (read side)
//! - `EventPublisher` - Domain event publishing
//! - `SessionValidator` - Bearer token validation

mod booking_reader;
mod booking_repository;
mod event_publisher;
mod session_validator;

pub use booking_reader::{
    BookingList, BookingListOptions, BookingReader, BookingSortField, SortDirection,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use booking_repository::BookingRepository;
pub use event_publisher::EventPublisher;
pub use session_validator::SessionValidator;
