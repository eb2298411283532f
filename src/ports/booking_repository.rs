//! Booking repository port (write side).
//!
//! Defines the contract for persisting and retrieving Booking aggregates.
//! A booking, its upsells and its derived totals are stored as one document,
//! so every write is atomic for that booking.

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{BookingId, DomainError};
use async_trait::async_trait;

/// Repository port for Booking aggregate persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Replace an existing booking, conditional on its stored status.
    ///
    /// The write only happens if the stored booking still has
    /// `expected_status`, the status the caller read before mutating.
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the booking doesn't exist
    /// - `ConcurrentModification` if the stored status differs
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
    ) -> Result<(), DomainError>;

    /// Find a booking by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;
}
