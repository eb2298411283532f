//! Booking aggregate entity.
//!
//! A booking is one vehicle-service job. It owns its upsells and carries the
//! derived totals produced by the cost aggregator.
//!
//! # Ownership
//!
//! Bookings reference catalog services and parts by id but do NOT own them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BookingId, Money, PartId, ServiceId, StateMachine, Timestamp, UpsellId, UserId,
};

use super::details::{
    optional_text, required_text, MAX_MAKE_MODEL_LENGTH, MAX_OWNER_ADDRESS_LENGTH,
    MAX_OWNER_CONTACT_LENGTH, MAX_OWNER_NAME_LENGTH, MAX_OWNER_POSTAL_CODE_LENGTH,
    MAX_REMARKS_LENGTH, MAX_VEHICLE_REG_NO_LENGTH,
};
use super::edit_guard::{self, BookingField, EditOverride};
use super::references::parse_references;
use super::totals::{self, CostEstimate, RecomputedTotals};
use super::{
    BookingDetails, BookingError, BookingInput, BookingPatch, BookingStatus, Upsell, UpsellInput,
    UpsellPatch,
};

/// Booking aggregate - a scheduled vehicle-service job.
///
/// # Invariants
///
/// - `totals` always equals `totals::recompute(self)` after a committed mutation
/// - service and part references contain no duplicates
/// - protected fields of a completed or cancelled booking change only under override
/// - every lifecycle stamp is set exactly when its status was entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,

    details: BookingDetails,

    /// Estimate captured when the booking was taken.
    prebooking: CostEstimate,

    prebooking_services: Vec<ServiceId>,
    confirmed_services: Vec<ServiceId>,
    confirmed_parts: Vec<PartId>,

    /// Derived; written only from `totals::recompute`.
    totals: RecomputedTotals,

    status: BookingStatus,

    upsells: Vec<Upsell>,

    created_by: UserId,
    updated_by: UserId,
    arrived_at: Option<Timestamp>,
    arrived_by: Option<UserId>,
    completed_at: Option<Timestamp>,
    completed_by: Option<UserId>,
    cancelled_at: Option<Timestamp>,
    cancelled_by: Option<UserId>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Booking {
    /// Creates a new pending booking and runs the aggregator once.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for blank or oversized text, or a negative amount
    /// - `InvalidReference` for a malformed service or part id
    pub fn create(input: BookingInput, actor: &UserId) -> Result<Self, BookingError> {
        let details = BookingDetails::from_input(&input)?;
        let prebooking = CostEstimate {
            labour_cost: Money::for_field("prebooking_labour_cost", input.prebooking_labour_cost)?,
            parts_cost: Money::for_field("prebooking_parts_cost", input.prebooking_parts_cost)?,
            booking_price: Money::for_field(
                "prebooking_booking_price",
                input.prebooking_booking_price,
            )?,
        };
        let prebooking_services = parse_references("prebooking_services", &input.prebooking_services)?;
        let confirmed_services = parse_references("confirmed_services", &input.confirmed_services)?;
        let confirmed_parts = parse_references("confirmed_parts", &input.confirmed_parts)?;

        let now = Timestamp::now();
        let mut booking = Self {
            id: BookingId::new(),
            details,
            prebooking,
            prebooking_services,
            confirmed_services,
            confirmed_parts,
            totals: RecomputedTotals::default(),
            status: BookingStatus::Pending,
            upsells: Vec::new(),
            created_by: actor.clone(),
            updated_by: actor.clone(),
            arrived_at: None,
            arrived_by: None,
            completed_at: None,
            completed_by: None,
            cancelled_at: None,
            cancelled_by: None,
            created_at: now,
            updated_at: now,
        };
        booking.refresh_totals();
        Ok(booking)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn details(&self) -> &BookingDetails {
        &self.details
    }

    pub fn prebooking(&self) -> &CostEstimate {
        &self.prebooking
    }

    pub fn prebooking_services(&self) -> &[ServiceId] {
        &self.prebooking_services
    }

    pub fn confirmed_services(&self) -> &[ServiceId] {
        &self.confirmed_services
    }

    pub fn confirmed_parts(&self) -> &[PartId] {
        &self.confirmed_parts
    }

    /// Returns the derived totals.
    pub fn totals(&self) -> &RecomputedTotals {
        &self.totals
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn upsells(&self) -> &[Upsell] {
        &self.upsells
    }

    /// Finds an embedded upsell by id.
    pub fn upsell(&self, upsell_id: &UpsellId) -> Option<&Upsell> {
        self.upsells.iter().find(|u| u.id == *upsell_id)
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn updated_by(&self) -> &UserId {
        &self.updated_by
    }

    pub fn arrived_at(&self) -> Option<&Timestamp> {
        self.arrived_at.as_ref()
    }

    pub fn arrived_by(&self) -> Option<&UserId> {
        self.arrived_by.as_ref()
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn completed_by(&self) -> Option<&UserId> {
        self.completed_by.as_ref()
    }

    pub fn cancelled_at(&self) -> Option<&Timestamp> {
        self.cancelled_at.as_ref()
    }

    pub fn cancelled_by(&self) -> Option<&UserId> {
        self.cancelled_by.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns true if the stored totals match a fresh aggregation.
    pub fn totals_are_consistent(&self) -> bool {
        self.totals == totals::recompute(self)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves the booking to `target`, stamping time and actor.
    ///
    /// Returns the previous status. Cancellation keeps the last computed
    /// totals.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if `target` is not reachable from the current status
    pub fn transition_to(
        &mut self,
        target: BookingStatus,
        actor: &UserId,
    ) -> Result<BookingStatus, BookingError> {
        let previous = self.status;
        let next = previous.transition_to(target)?;

        let now = Timestamp::now();
        match next {
            BookingStatus::Arrived => {
                self.arrived_at = Some(now);
                self.arrived_by = Some(actor.clone());
            }
            BookingStatus::Completed => {
                self.completed_at = Some(now);
                self.completed_by = Some(actor.clone());
            }
            BookingStatus::Cancelled => {
                self.cancelled_at = Some(now);
                self.cancelled_by = Some(actor.clone());
            }
            // The initial state has no stamp, so it can never be entered.
            BookingStatus::Pending => {
                return Err(BookingError::InvalidTransition {
                    from: previous,
                    to: next,
                })
            }
        }
        self.status = next;
        self.touch(actor, now);
        self.refresh_totals();
        Ok(previous)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Field edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies a partial update, returning the fields whose value changed.
    ///
    /// The patch is validated and checked by the edit guard in full before
    /// anything is assigned.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the patch is empty or a value is invalid
    /// - `InvalidReference` for a malformed service or part id
    /// - `EditForbidden` if a protected field of a closed booking changes
    pub fn apply_patch(
        &mut self,
        patch: BookingPatch,
        actor: &UserId,
        edit_override: EditOverride,
    ) -> Result<Vec<BookingField>, BookingError> {
        if patch.is_empty() {
            return Err(BookingError::validation(
                "patch",
                "at least one field must be provided",
            ));
        }

        let mut details = self.details.clone();
        let mut prebooking = self.prebooking;
        let mut prebooking_services = self.prebooking_services.clone();
        let mut confirmed_services = self.confirmed_services.clone();
        let mut confirmed_parts = self.confirmed_parts.clone();
        let mut changed = Vec::new();

        if let Some(raw) = patch.vehicle_reg_no.as_deref() {
            let value = required_text("vehicle_reg_no", raw, MAX_VEHICLE_REG_NO_LENGTH)?;
            assign(&mut details.vehicle_reg_no, value, BookingField::VehicleRegNo, &mut changed);
        }
        if let Some(raw) = patch.make_model.as_deref() {
            let value = required_text("make_model", raw, MAX_MAKE_MODEL_LENGTH)?;
            assign(&mut details.make_model, value, BookingField::MakeModel, &mut changed);
        }
        if let Some(raw) = patch.owner_name.as_deref() {
            let value = required_text("owner_name", raw, MAX_OWNER_NAME_LENGTH)?;
            assign(&mut details.owner_name, value, BookingField::OwnerName, &mut changed);
        }
        if let Some(raw) = patch.owner_address.as_deref() {
            let value = optional_text("owner_address", Some(raw), MAX_OWNER_ADDRESS_LENGTH)?;
            assign(&mut details.owner_address, value, BookingField::OwnerAddress, &mut changed);
        }
        if let Some(raw) = patch.owner_postal_code.as_deref() {
            let value = optional_text("owner_postal_code", Some(raw), MAX_OWNER_POSTAL_CODE_LENGTH)?;
            assign(
                &mut details.owner_postal_code,
                value,
                BookingField::OwnerPostalCode,
                &mut changed,
            );
        }
        if let Some(raw) = patch.owner_contact.as_deref() {
            let value = optional_text("owner_contact", Some(raw), MAX_OWNER_CONTACT_LENGTH)?;
            assign(&mut details.owner_contact, value, BookingField::OwnerContact, &mut changed);
        }
        if let Some(date) = patch.scheduled_date {
            assign(&mut details.scheduled_date, date, BookingField::ScheduledDate, &mut changed);
        }
        if let Some(raw) = patch.remarks.as_deref() {
            let value = optional_text("remarks", Some(raw), MAX_REMARKS_LENGTH)?;
            assign(&mut details.remarks, value, BookingField::Remarks, &mut changed);
        }
        if let Some(raw) = patch.prebooking_services.as_deref() {
            let value = parse_references("prebooking_services", raw)?;
            assign(
                &mut prebooking_services,
                value,
                BookingField::PrebookingServices,
                &mut changed,
            );
        }
        if let Some(raw) = patch.confirmed_services.as_deref() {
            let value = parse_references("confirmed_services", raw)?;
            assign(
                &mut confirmed_services,
                value,
                BookingField::ConfirmedServices,
                &mut changed,
            );
        }
        if let Some(raw) = patch.confirmed_parts.as_deref() {
            let value = parse_references("confirmed_parts", raw)?;
            assign(&mut confirmed_parts, value, BookingField::ConfirmedParts, &mut changed);
        }
        if let Some(cents) = patch.prebooking_labour_cost {
            let value = Money::for_field("prebooking_labour_cost", cents)?;
            assign(
                &mut prebooking.labour_cost,
                value,
                BookingField::PrebookingLabourCost,
                &mut changed,
            );
        }
        if let Some(cents) = patch.prebooking_parts_cost {
            let value = Money::for_field("prebooking_parts_cost", cents)?;
            assign(
                &mut prebooking.parts_cost,
                value,
                BookingField::PrebookingPartsCost,
                &mut changed,
            );
        }
        if let Some(cents) = patch.prebooking_booking_price {
            let value = Money::for_field("prebooking_booking_price", cents)?;
            assign(
                &mut prebooking.booking_price,
                value,
                BookingField::PrebookingBookingPrice,
                &mut changed,
            );
        }

        edit_guard::assert_editable(self.status, &changed, edit_override)?;

        if changed.is_empty() {
            return Ok(changed);
        }

        self.details = details;
        self.prebooking = prebooking;
        self.prebooking_services = prebooking_services;
        self.confirmed_services = confirmed_services;
        self.confirmed_parts = confirmed_parts;
        self.touch(actor, Timestamp::now());
        if changed.iter().any(BookingField::is_cost_relevant) {
            self.refresh_totals();
        }
        Ok(changed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Upsells
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a new upsell and re-aggregates.
    ///
    /// # Errors
    ///
    /// - `EditForbidden` if the booking is closed and no override is granted
    /// - `InvalidReference` / `ValidationFailed` for bad input
    pub fn add_upsell(
        &mut self,
        input: UpsellInput,
        actor: &UserId,
        edit_override: EditOverride,
    ) -> Result<UpsellId, BookingError> {
        edit_guard::assert_editable(self.status, &[BookingField::Upsells], edit_override)?;

        let now = Timestamp::now();
        let upsell = Upsell::create(input, actor, now)?;
        let upsell_id = upsell.id;
        self.upsells.push(upsell);
        self.touch(actor, now);
        self.refresh_totals();
        Ok(upsell_id)
    }

    /// Applies a partial update to an embedded upsell and re-aggregates.
    ///
    /// # Errors
    ///
    /// - `UpsellNotFound` if no upsell has this id
    /// - `EditForbidden` if the booking is closed and no override is granted
    /// - `ValidationFailed` if the patch is empty or invalid
    pub fn update_upsell(
        &mut self,
        upsell_id: &UpsellId,
        patch: UpsellPatch,
        actor: &UserId,
        edit_override: EditOverride,
    ) -> Result<(), BookingError> {
        let index = self.upsell_index(upsell_id)?;
        edit_guard::assert_editable(self.status, &[BookingField::Upsells], edit_override)?;
        if patch.is_empty() {
            return Err(BookingError::validation(
                "patch",
                "at least one field must be provided",
            ));
        }

        let now = Timestamp::now();
        let updated = self.upsells[index].patched(patch, actor, now)?;
        self.upsells[index] = updated;
        self.touch(actor, now);
        self.refresh_totals();
        Ok(())
    }

    /// Removes an embedded upsell and re-aggregates, returning it.
    ///
    /// # Errors
    ///
    /// - `UpsellNotFound` if no upsell has this id
    /// - `EditForbidden` if the booking is closed and no override is granted
    pub fn remove_upsell(
        &mut self,
        upsell_id: &UpsellId,
        actor: &UserId,
        edit_override: EditOverride,
    ) -> Result<Upsell, BookingError> {
        let index = self.upsell_index(upsell_id)?;
        edit_guard::assert_editable(self.status, &[BookingField::Upsells], edit_override)?;

        let removed = self.upsells.remove(index);
        self.touch(actor, Timestamp::now());
        self.refresh_totals();
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn upsell_index(&self, upsell_id: &UpsellId) -> Result<usize, BookingError> {
        self.upsells
            .iter()
            .position(|u| u.id == *upsell_id)
            .ok_or_else(|| BookingError::upsell_not_found(self.id, *upsell_id))
    }

    fn touch(&mut self, actor: &UserId, now: Timestamp) {
        self.updated_by = actor.clone();
        self.updated_at = now;
    }

    fn refresh_totals(&mut self) {
        self.totals = totals::recompute(self);
    }
}

fn assign<T: PartialEq>(
    slot: &mut T,
    value: T,
    field: BookingField,
    changed: &mut Vec<BookingField>,
) {
    if *slot != value {
        *slot = value;
        changed.push(field);
    }
}
