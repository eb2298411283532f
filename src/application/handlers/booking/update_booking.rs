//! UpdateBookingHandler - Command handler for partial booking edits.

use std::sync::Arc;

use crate::domain::booking::{
    Booking, BookingDetailsUpdated, BookingError, BookingField, BookingPatch, EditOverride,
};
use crate::domain::foundation::{
    BookingId, CommandMetadata, EventId, SerializableDomainEvent, StateMachine,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to update booking fields.
#[derive(Debug, Clone)]
pub struct UpdateBookingCommand {
    pub booking_id: BookingId,
    pub patch: BookingPatch,
    /// Caller asks to bypass the edit guard. Only honoured for admins.
    pub override_requested: bool,
}

/// Result of a booking update.
#[derive(Debug, Clone)]
pub struct UpdateBookingResult {
    pub booking: Booking,
    /// Fields whose value actually changed. Empty means nothing was written.
    pub changed_fields: Vec<BookingField>,
}

/// Handler for updating booking fields.
pub struct UpdateBookingHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateBookingHandler {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    #[tracing::instrument(skip_all, fields(booking_id = %cmd.booking_id, user_id = %metadata.user_id))]
    pub async fn handle(
        &self,
        cmd: UpdateBookingCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateBookingResult, BookingError> {
        // 1. Load
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(cmd.booking_id))?;

        // 2. Guard and apply
        let edit_override = EditOverride::resolve(cmd.override_requested, metadata.role);
        let expected_status = booking.status();
        let changed_fields = booking
            .apply_patch(cmd.patch, &metadata.user_id, edit_override)
            .inspect_err(|e| {
                if matches!(e, BookingError::EditForbidden { .. }) {
                    tracing::warn!(status = %expected_status, "Booking edit rejected by guard");
                }
            })?;

        if changed_fields.is_empty() {
            tracing::debug!("Patch matched stored values; nothing to write");
            return Ok(UpdateBookingResult {
                booking,
                changed_fields,
            });
        }

        // 3. Persist
        self.repository.update(&booking, expected_status).await?;

        // 4. Publish event (failure is logged, not returned)
        let overridden = edit_override.is_granted()
            && expected_status.is_terminal()
            && changed_fields.iter().any(BookingField::is_protected);
        let event = BookingDetailsUpdated {
            event_id: EventId::new(),
            booking_id: cmd.booking_id,
            changed_fields: changed_fields.clone(),
            overridden,
            updated_by: metadata.user_id.clone(),
            updated_at: *booking.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        if let Err(e) = self.event_publisher.publish(envelope).await {
            tracing::warn!(error = %e, "Event publish failed; booking write already committed");
        }

        if overridden {
            tracing::warn!(status = %expected_status, "Edit guard overridden by admin");
        }
        tracing::info!(changed = changed_fields.len(), "Booking updated");

        Ok(UpdateBookingResult {
            booking,
            changed_fields,
        })
    }
}
