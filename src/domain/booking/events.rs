//! Booking domain events.
//!
//! - `BookingCreated` - New booking taken
//! - `BookingDetailsUpdated` - Descriptive or estimate fields changed
//! - `BookingStatusChanged` - Lifecycle transition committed
//! - `UpsellAdded` / `UpsellUpdated` / `UpsellRemoved` - Upsell ledger changes

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, BookingId, EventId, Money, Timestamp, UpsellId, UserId};

use super::{BookingField, BookingStatus};

// ════════════════════════════════════════════════════════════════════════════
// BookingCreated
// ════════════════════════════════════════════════════════════════════════════

/// Published when a new booking is taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreated {
    pub event_id: EventId,
    pub booking_id: BookingId,
    pub vehicle_reg_no: String,
    pub scheduled_date: Timestamp,
    pub booking_price: Money,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

domain_event!(
    BookingCreated,
    event_type = "booking.created.v1",
    aggregate_id = booking_id,
    aggregate_type = "Booking",
    occurred_at = created_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// BookingDetailsUpdated
// ════════════════════════════════════════════════════════════════════════════

/// Published when booking fields are edited.
///
/// `overridden` is set when an admin override was used on a closed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetailsUpdated {
    pub event_id: EventId,
    pub booking_id: BookingId,
    pub changed_fields: Vec<BookingField>,
    pub overridden: bool,
    pub updated_by: UserId,
    pub updated_at: Timestamp,
}

domain_event!(
    BookingDetailsUpdated,
    event_type = "booking.details_updated.v1",
    aggregate_id = booking_id,
    aggregate_type = "Booking",
    occurred_at = updated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// BookingStatusChanged
// ════════════════════════════════════════════════════════════════════════════

/// Published when a booking moves through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingStatusChanged {
    pub event_id: EventId,
    pub booking_id: BookingId,
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub changed_by: UserId,
    pub changed_at: Timestamp,
}

domain_event!(
    BookingStatusChanged,
    event_type = "booking.status_changed.v1",
    aggregate_id = booking_id,
    aggregate_type = "Booking",
    occurred_at = changed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Upsell events
// ════════════════════════════════════════════════════════════════════════════

/// Published when an upsell is added to a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsellAdded {
    pub event_id: EventId,
    pub booking_id: BookingId,
    pub upsell_id: UpsellId,
    pub upsell_price: Money,
    /// Booking price after re-aggregation.
    pub booking_price: Money,
    pub added_by: UserId,
    pub added_at: Timestamp,
}

domain_event!(
    UpsellAdded,
    event_type = "booking.upsell_added.v1",
    aggregate_id = booking_id,
    aggregate_type = "Booking",
    occurred_at = added_at,
    event_id = event_id
);

/// Published when an upsell is corrected in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsellUpdated {
    pub event_id: EventId,
    pub booking_id: BookingId,
    pub upsell_id: UpsellId,
    pub booking_price: Money,
    pub updated_by: UserId,
    pub updated_at: Timestamp,
}

domain_event!(
    UpsellUpdated,
    event_type = "booking.upsell_updated.v1",
    aggregate_id = booking_id,
    aggregate_type = "Booking",
    occurred_at = updated_at,
    event_id = event_id
);

/// Published when an upsell is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsellRemoved {
    pub event_id: EventId,
    pub booking_id: BookingId,
    pub upsell_id: UpsellId,
    pub booking_price: Money,
    pub removed_by: UserId,
    pub removed_at: Timestamp,
}

domain_event!(
    UpsellRemoved,
    event_type = "booking.upsell_removed.v1",
    aggregate_id = booking_id,
    aggregate_type = "Booking",
    occurred_at = removed_at,
    event_id = event_id
);
