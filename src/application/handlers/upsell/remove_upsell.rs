//! RemoveUpsellHandler - Command handler for deleting an upsell.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, EditOverride, Upsell, UpsellRemoved};
use crate::domain::foundation::{
    BookingId, CommandMetadata, EventId, SerializableDomainEvent, UpsellId,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to remove an upsell.
#[derive(Debug, Clone)]
pub struct RemoveUpsellCommand {
    pub booking_id: BookingId,
    pub upsell_id: UpsellId,
    pub override_requested: bool,
}

/// Result of removing an upsell.
#[derive(Debug, Clone)]
pub struct RemoveUpsellResult {
    pub booking: Booking,
    pub removed: Upsell,
}

/// Handler for removing upsells.
pub struct RemoveUpsellHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RemoveUpsellHandler {
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
        cmd: RemoveUpsellCommand,
        metadata: CommandMetadata,
    ) -> Result<RemoveUpsellResult, BookingError> {
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(cmd.booking_id))?;

        let edit_override = EditOverride::resolve(cmd.override_requested, metadata.role);
        let expected_status = booking.status();
        let removed = booking
            .remove_upsell(&cmd.upsell_id, &metadata.user_id, edit_override)
            .inspect_err(|e| {
                if matches!(e, BookingError::EditForbidden { .. }) {
                    tracing::warn!(status = %expected_status, "Upsell removal rejected by guard");
                }
            })?;

        self.repository.update(&booking, expected_status).await?;

        let event = UpsellRemoved {
            event_id: EventId::new(),
            booking_id: cmd.booking_id,
            upsell_id: cmd.upsell_id,
            booking_price: booking.totals().booking_price,
            removed_by: metadata.user_id.clone(),
            removed_at: *booking.updated_at(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());

        if let Err(e) = self.event_publisher.publish(envelope).await {
            tracing::warn!(error = %e, "Event publish failed; booking write already committed");
        }

        tracing::info!(booking_price = %booking.totals().booking_price, "Upsell removed");
        Ok(RemoveUpsellResult { booking, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::booking::{BookingStatus, UpsellInput};
    use crate::domain::foundation::PartId;

    #[tokio::test]
    async fn removal_restores_previous_totals_exactly() {
        let (store, bus) = store_and_bus();
        let original = seed_booking(&store, BookingStatus::Arrived).await;

        let part = PartId::new();
        let mut booking = original.clone();
        let upsell_id = booking
            .add_upsell(
                UpsellInput {
                    parts: vec![part.to_string()],
                    ..upsell_input(50, 20, 100)
                },
                &staff_id(),
                EditOverride::None,
            )
            .unwrap();
        store.update(&booking, BookingStatus::Arrived).await.unwrap();
        assert_eq!(booking.totals().booking_price.cents(), 400);
        assert!(booking.totals().parts.contains(&part));

        let handler = RemoveUpsellHandler::new(store.clone(), bus.clone());
        let result = handler
            .handle(
                RemoveUpsellCommand {
                    booking_id: *original.id(),
                    upsell_id,
                    override_requested: false,
                },
                staff_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.removed.id, upsell_id);
        assert_eq!(result.booking.totals(), original.totals());
        assert!(!result.booking.totals().parts.contains(&part));
        let stored = store.find_by_id(original.id()).await.unwrap().unwrap();
        assert!(stored.upsells().is_empty());
        assert!(bus.has_event("booking.upsell_removed.v1"));
    }

    #[tokio::test]
    async fn unknown_upsell_is_not_found() {
        let (store, bus) = store_and_bus();
        let booking = seed_booking(&store, BookingStatus::Pending).await;
        let handler = RemoveUpsellHandler::new(store, bus.clone());

        let result = handler
            .handle(
                RemoveUpsellCommand {
                    booking_id: *booking.id(),
                    upsell_id: UpsellId::new(),
                    override_requested: false,
                },
                staff_metadata(),
            )
            .await;

        assert!(matches!(result, Err(BookingError::UpsellNotFound { .. })));
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let (store, bus) = store_and_bus();
        let handler = RemoveUpsellHandler::new(store, bus);
        let id = BookingId::new();

        let result = handler
            .handle(
                RemoveUpsellCommand {
                    booking_id: id,
                    upsell_id: UpsellId::new(),
                    override_requested: false,
                },
                staff_metadata(),
            )
            .await;

        assert_eq!(result.unwrap_err(), BookingError::NotFound(id));
    }
}
