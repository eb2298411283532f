//! CreateBookingHandler - Command handler for taking a new booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingCreated, BookingError, BookingInput};
use crate::domain::foundation::{CommandMetadata, EventId, SerializableDomainEvent};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to create a new booking.
#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub input: BookingInput,
}

/// Result of successful booking creation.
#[derive(Debug, Clone)]
pub struct CreateBookingResult {
    pub booking: Booking,
    pub event: BookingCreated,
}

/// Handler for creating bookings.
pub struct CreateBookingHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateBookingHandler {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    #[tracing::instrument(skip_all, fields(user_id = %metadata.user_id))]
    pub async fn handle(
        &self,
        cmd: CreateBookingCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateBookingResult, BookingError> {
        // 1. Validate and build (status pending, totals aggregated once)
        let booking = Booking::create(cmd.input, &metadata.user_id)?;

        // 2. Persist
        self.repository.save(&booking).await?;

        // 3. Publish event (failure is logged, not returned)
        let event = BookingCreated {
            event_id: EventId::new(),
            booking_id: *booking.id(),
            vehicle_reg_no: booking.details().vehicle_reg_no.clone(),
            scheduled_date: booking.details().scheduled_date,
            booking_price: booking.totals().booking_price,
            created_by: metadata.user_id.clone(),
            created_at: *booking.created_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        if let Err(e) = self.event_publisher.publish(envelope).await {
            tracing::warn!(error = %e, "Event publish failed; booking write already committed");
        }

        tracing::info!(booking_id = %booking.id(), "Booking created");
        Ok(CreateBookingResult { booking, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::booking::BookingStatus;

    #[tokio::test]
    async fn creates_pending_booking_with_totals() {
        let (store, bus) = store_and_bus();
        let handler = CreateBookingHandler::new(store.clone(), bus.clone());

        let result = handler
            .handle(
                CreateBookingCommand {
                    input: booking_input(200, 80, 300),
                },
                staff_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.booking.status(), BookingStatus::Pending);
        assert_eq!(result.booking.totals().booking_price.cents(), 300);
        assert_eq!(result.booking.created_by(), &staff_id());
        assert_eq!(
            store.find_by_id(result.booking.id()).await.unwrap(),
            Some(result.booking.clone())
        );
    }

    #[tokio::test]
    async fn publishes_booking_created_event() {
        let (store, bus) = store_and_bus();
        let handler = CreateBookingHandler::new(store, bus.clone());

        let result = handler
            .handle(
                CreateBookingCommand {
                    input: booking_input(0, 0, 0),
                },
                staff_metadata(),
            )
            .await
            .unwrap();

        let events = bus.events_of_type("booking.created.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].aggregate_id, result.booking.id().to_string());
        assert_eq!(
            events[0].metadata.correlation_id.as_deref(),
            Some("test-correlation")
        );
    }

    #[tokio::test]
    async fn rejects_invalid_input_without_persisting() {
        let (store, bus) = store_and_bus();
        let handler = CreateBookingHandler::new(store.clone(), bus.clone());

        let result = handler
            .handle(
                CreateBookingCommand {
                    input: booking_input(0, -10, 0),
                },
                staff_metadata(),
            )
            .await;

        assert!(matches!(result, Err(BookingError::ValidationFailed { .. })));
        assert!(store.is_empty().await);
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn publisher_failure_still_returns_committed_booking() {
        let (store, bus) = store_and_bus();
        bus.fail_with("broker down");
        let handler = CreateBookingHandler::new(store.clone(), bus.clone());

        let result = handler
            .handle(
                CreateBookingCommand {
                    input: booking_input(0, 0, 0),
                },
                staff_metadata(),
            )
            .await
            .unwrap();

        let stored = store.find_by_id(result.booking.id()).await.unwrap();
        assert_eq!(stored.as_ref(), Some(&result.booking));
        assert_eq!(store.len().await, 1);
        assert_eq!(bus.event_count(), 0);
    }
}
