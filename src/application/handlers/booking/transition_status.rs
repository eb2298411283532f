//! TransitionStatusHandler - Command handler for lifecycle moves.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, BookingStatus, BookingStatusChanged};
use crate::domain::foundation::{BookingId, CommandMetadata, EventId, SerializableDomainEvent};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to move a booking to a new status.
#[derive(Debug, Clone)]
pub struct TransitionStatusCommand {
    pub booking_id: BookingId,
    pub target: BookingStatus,
}

/// Result of a status transition.
#[derive(Debug, Clone)]
pub struct TransitionStatusResult {
    pub booking: Booking,
    pub previous: BookingStatus,
}

/// Handler for booking status transitions.
pub struct TransitionStatusHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl TransitionStatusHandler {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(booking_id = %cmd.booking_id, target = %cmd.target, user_id = %metadata.user_id)
    )]
    pub async fn handle(
        &self,
        cmd: TransitionStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<TransitionStatusResult, BookingError> {
        // 1. Load
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(cmd.booking_id))?;

        // 2. Transition (stamps actor and time, re-aggregates)
        let previous = booking
            .transition_to(cmd.target, &metadata.user_id)
            .inspect_err(|e| tracing::warn!(error = %e, "Status transition rejected"))?;

        // 3. Persist, conditional on the status we read
        self.repository
            .update(&booking, previous)
            .await
            .map_err(BookingError::from)
            .inspect_err(|e| {
                if matches!(e, BookingError::Conflict(_)) {
                    tracing::warn!(error = %e, "Status transition lost a concurrent race");
                }
            })?;

        // 4. Publish event (failure is logged, not returned)
        let event = BookingStatusChanged {
            event_id: EventId::new(),
            booking_id: cmd.booking_id,
            from: previous,
            to: booking.status(),
            changed_by: metadata.user_id.clone(),
            changed_at: *booking.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        if let Err(e) = self.event_publisher.publish(envelope).await {
            tracing::warn!(error = %e, "Event publish failed; booking write already committed");
        }

        tracing::info!(from = %previous, to = %booking.status(), "Booking status changed");
        Ok(TransitionStatusResult { booking, previous })
    }
}
