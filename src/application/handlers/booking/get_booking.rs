//! GetBookingHandler - Query handler for a single booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::BookingId;
use crate::ports::BookingRepository;

/// Query to fetch one booking.
#[derive(Debug, Clone)]
pub struct GetBookingQuery {
    pub booking_id: BookingId,
}

/// Handler for fetching a booking by id.
pub struct GetBookingHandler {
    repository: Arc<dyn BookingRepository>,
}

impl GetBookingHandler {
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetBookingQuery) -> Result<Booking, BookingError> {
        self.repository
            .find_by_id(&query.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(query.booking_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::booking::BookingStatus;

    #[tokio::test]
    async fn returns_stored_booking() {
        let (store, _bus) = store_and_bus();
        let booking = seed_booking(&store, BookingStatus::Arrived).await;
        let handler = GetBookingHandler::new(store);

        let found = handler
            .handle(GetBookingQuery {
                booking_id: *booking.id(),
            })
            .await
            .unwrap();

        assert_eq!(found, booking);
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let (store, _bus) = store_and_bus();
        let handler = GetBookingHandler::new(store);
        let id = BookingId::new();

        let result = handler.handle(GetBookingQuery { booking_id: id }).await;

        assert_eq!(result.unwrap_err(), BookingError::NotFound(id));
    }
}
