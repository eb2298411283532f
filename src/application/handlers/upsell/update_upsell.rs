//! UpdateUpsellHandler - Command handler for editing an existing upsell.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, EditOverride, UpsellPatch, UpsellUpdated};
use crate::domain::foundation::{
    BookingId, CommandMetadata, EventId, SerializableDomainEvent, UpsellId,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to update an upsell.
#[derive(Debug, Clone)]
pub struct UpdateUpsellCommand {
    pub booking_id: BookingId,
    pub upsell_id: UpsellId,
    pub patch: UpsellPatch,
    pub override_requested: bool,
}

/// Result of updating an upsell.
#[derive(Debug, Clone)]
pub struct UpdateUpsellResult {
    pub booking: Booking,
}

/// Handler for updating upsells.
pub struct UpdateUpsellHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateUpsellHandler {
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
        fields(booking_id = %cmd.booking_id, upsell_id = %cmd.upsell_id, user_id = %metadata.user_id)
    )]
    pub async fn handle(
        &self,
        cmd: UpdateUpsellCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateUpsellResult, BookingError> {
        // 1. Load
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(cmd.booking_id))?;

        // 2. Guard, patch, re-aggregate
        let edit_override = EditOverride::resolve(cmd.override_requested, metadata.role);
        let expected_status = booking.status();
        booking
            .update_upsell(&cmd.upsell_id, cmd.patch, &metadata.user_id, edit_override)
            .inspect_err(|e| {
                if matches!(e, BookingError::EditForbidden { .. }) {
                    tracing::warn!(status = %expected_status, "Upsell update rejected by guard");
                }
            })?;

        // 3. Persist
        self.repository.update(&booking, expected_status).await?;

        // 4. Publish event (failure is logged, not returned)
        let event = UpsellUpdated {
            event_id: EventId::new(),
            booking_id: cmd.booking_id,
            upsell_id: cmd.upsell_id,
            booking_price: booking.totals().booking_price,
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

        tracing::info!(booking_price = %booking.totals().booking_price, "Upsell updated");
        Ok(UpdateUpsellResult { booking })
    }
}
