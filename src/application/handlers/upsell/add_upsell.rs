//! AddUpsellHandler - Command handler for recording an upsell on a booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, EditOverride, UpsellAdded, UpsellInput};
use crate::domain::foundation::{
    BookingId, CommandMetadata, EventId, SerializableDomainEvent, UpsellId,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to add an upsell.
#[derive(Debug, Clone)]
pub struct AddUpsellCommand {
    pub booking_id: BookingId,
    pub input: UpsellInput,
    pub override_requested: bool,
}

/// Result of adding an upsell.
#[derive(Debug, Clone)]
pub struct AddUpsellResult {
    pub booking: Booking,
    pub upsell_id: UpsellId,
}

/// Handler for adding upsells.
pub struct AddUpsellHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AddUpsellHandler {
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
        cmd: AddUpsellCommand,
        metadata: CommandMetadata,
    ) -> Result<AddUpsellResult, BookingError> {
        // 1. Load
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(cmd.booking_id))?;

        // 2. Guard, append, re-aggregate
        let edit_override = EditOverride::resolve(cmd.override_requested, metadata.role);
        let expected_status = booking.status();
        let upsell_id = booking
            .add_upsell(cmd.input, &metadata.user_id, edit_override)
            .inspect_err(|e| {
                if matches!(e, BookingError::EditForbidden { .. }) {
                    tracing::warn!(status = %expected_status, "Upsell add rejected by guard");
                }
            })?;

        // 3. Persist upsell and totals together
        self.repository.update(&booking, expected_status).await?;

        // 4. Publish event (failure is logged, not returned)
        let upsell_price = booking
            .upsell(&upsell_id)
            .map(|u| u.upsell_price)
            .unwrap_or_default();
        let event = UpsellAdded {
            event_id: EventId::new(),
            booking_id: cmd.booking_id,
            upsell_id,
            upsell_price,
            booking_price: booking.totals().booking_price,
            added_by: metadata.user_id.clone(),
            added_at: *booking.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        if let Err(e) = self.event_publisher.publish(envelope).await {
            tracing::warn!(error = %e, "Event publish failed; booking write already committed");
        }

        tracing::info!(upsell_id = %upsell_id, booking_price = %booking.totals().booking_price, "Upsell added");
        Ok(AddUpsellResult { booking, upsell_id })
    }
}
