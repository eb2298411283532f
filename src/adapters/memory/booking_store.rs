//! In-memory booking store.
//!
//! Implements both `BookingRepository` and `BookingReader` over a map of
//! whole booking documents. Used by tests and local development.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{BookingId, DomainError, ErrorCode};
use crate::ports::{
    BookingList, BookingListOptions, BookingReader, BookingRepository, BookingSortField,
    SortDirection,
};

/// In-memory storage for bookings.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bookings.
    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }

    /// Clear all stored bookings (useful for tests).
    pub async fn clear(&self) {
        self.bookings.write().await.clear();
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingStore {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(*booking.id(), booking.clone());
        Ok(())
    }

    async fn update(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
    ) -> Result<(), DomainError> {
        // Check and write under one lock so the status compare is atomic.
        let mut bookings = self.bookings.write().await;
        let stored = bookings.get_mut(booking.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::BookingNotFound,
                format!("Booking not found: {}", booking.id()),
            )
            .with_detail("booking_id", booking.id().to_string())
        })?;

        if stored.status() != expected_status {
            return Err(DomainError::new(
                ErrorCode::ConcurrentModification,
                format!(
                    "Booking {} is now {}, expected {}",
                    booking.id(),
                    stored.status(),
                    expected_status
                ),
            ));
        }

        *stored = booking.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.bookings.read().await.get(id).cloned())
    }
}

#[async_trait]
impl BookingReader for InMemoryBookingStore {
    async fn list(&self, options: &BookingListOptions) -> Result<BookingList, DomainError> {
        let bookings = self.bookings.read().await;
        let mut matching: Vec<&Booking> = bookings.values().filter(|b| options.matches(b)).collect();

        matching.sort_by(|a, b| {
            let ordering = compare(a, b, options.sort_by).then_with(|| {
                a.created_at()
                    .cmp(b.created_at())
                    .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
            });
            match options.sort_dir {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(options.offset() as usize)
            .take(options.limit as usize)
            .cloned()
            .collect();

        Ok(BookingList::new(items, total, options.page, options.limit))
    }
}

fn compare(a: &Booking, b: &Booking, field: BookingSortField) -> Ordering {
    match field {
        BookingSortField::CreatedAt => a.created_at().cmp(b.created_at()),
        BookingSortField::UpdatedAt => a.updated_at().cmp(b.updated_at()),
        BookingSortField::ScheduledDate => a
            .details()
            .scheduled_date
            .cmp(&b.details().scheduled_date),
        BookingSortField::OwnerName => a
            .details()
            .owner_name
            .to_lowercase()
            .cmp(&b.details().owner_name.to_lowercase()),
        BookingSortField::VehicleRegNo => a
            .details()
            .vehicle_reg_no
            .to_lowercase()
            .cmp(&b.details().vehicle_reg_no.to_lowercase()),
        BookingSortField::Status => a.status().as_str().cmp(b.status().as_str()),
    }
}
