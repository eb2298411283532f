//! PostgreSQL adapters.
//!
//! Implementations of the persistence ports backed by `sqlx`.

mod booking_repository;

pub use booking_repository::PostgresBookingRepository;
