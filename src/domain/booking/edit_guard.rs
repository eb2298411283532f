//! Edit guard for closed bookings.
//!
//! Once a booking is completed or cancelled its business fields are frozen.
//! The guard is a pure decision table over `(status, changed fields,
//! override)` and is evaluated before any field is assigned.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{StaffRole, StateMachine};

use super::{BookingError, BookingStatus};

/// A mutable field of a booking, as seen by the edit guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    VehicleRegNo,
    MakeModel,
    OwnerName,
    OwnerAddress,
    OwnerPostalCode,
    OwnerContact,
    ScheduledDate,
    Remarks,
    PrebookingServices,
    ConfirmedServices,
    ConfirmedParts,
    PrebookingLabourCost,
    PrebookingPartsCost,
    PrebookingBookingPrice,
    Upsells,
}

impl BookingField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingField::VehicleRegNo => "vehicle_reg_no",
            BookingField::MakeModel => "make_model",
            BookingField::OwnerName => "owner_name",
            BookingField::OwnerAddress => "owner_address",
            BookingField::OwnerPostalCode => "owner_postal_code",
            BookingField::OwnerContact => "owner_contact",
            BookingField::ScheduledDate => "scheduled_date",
            BookingField::Remarks => "remarks",
            BookingField::PrebookingServices => "prebooking_services",
            BookingField::ConfirmedServices => "confirmed_services",
            BookingField::ConfirmedParts => "confirmed_parts",
            BookingField::PrebookingLabourCost => "prebooking_labour_cost",
            BookingField::PrebookingPartsCost => "prebooking_parts_cost",
            BookingField::PrebookingBookingPrice => "prebooking_booking_price",
            BookingField::Upsells => "upsells",
        }
    }

    /// Returns true if the field is frozen once the booking is closed.
    ///
    /// Remarks stay editable so staff can annotate finished jobs.
    pub fn is_protected(&self) -> bool {
        !matches!(self, BookingField::Remarks)
    }

    /// Returns true if changing the field affects the derived totals.
    pub fn is_cost_relevant(&self) -> bool {
        matches!(
            self,
            BookingField::PrebookingServices
                | BookingField::ConfirmedServices
                | BookingField::ConfirmedParts
                | BookingField::PrebookingLabourCost
                | BookingField::PrebookingPartsCost
                | BookingField::PrebookingBookingPrice
                | BookingField::Upsells
        )
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the caller may write protected fields on a closed booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditOverride {
    #[default]
    None,
    Granted,
}

impl EditOverride {
    /// Grants the override only if it was requested by an admin.
    ///
    /// A staff member asking for an override is treated as not asking.
    pub fn resolve(requested: bool, role: StaffRole) -> Self {
        if requested && role.can_override_edit_guard() {
            EditOverride::Granted
        } else {
            EditOverride::None
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, EditOverride::Granted)
    }
}

/// Outcome of an edit guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditDecision {
    /// Booking is open, or no protected field was touched.
    Allowed,
    /// Protected fields of a closed booking, let through by an override.
    Overridden {
        status: BookingStatus,
        fields: Vec<BookingField>,
    },
    /// Protected fields of a closed booking, no override.
    Denied {
        status: BookingStatus,
        fields: Vec<BookingField>,
    },
}

impl EditDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, EditDecision::Denied { .. })
    }

    /// Human-readable reason for the decision.
    pub fn reason(&self) -> String {
        match self {
            EditDecision::Allowed => "no protected field of a closed booking changed".to_string(),
            EditDecision::Overridden { status, fields } => format!(
                "override granted for {} booking fields: {}",
                status,
                join_fields(fields)
            ),
            EditDecision::Denied { status, fields } => format!(
                "booking is {}; protected fields changed: {}",
                status,
                join_fields(fields)
            ),
        }
    }
}

fn join_fields(fields: &[BookingField]) -> String {
    fields
        .iter()
        .map(BookingField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Evaluates the edit policy without side effects.
pub fn evaluate(
    status: BookingStatus,
    changed_fields: &[BookingField],
    edit_override: EditOverride,
) -> EditDecision {
    if !status.is_terminal() {
        return EditDecision::Allowed;
    }

    let mut protected: Vec<BookingField> = Vec::new();
    for field in changed_fields.iter().filter(|f| f.is_protected()) {
        if !protected.contains(field) {
            protected.push(*field);
        }
    }

    if protected.is_empty() {
        EditDecision::Allowed
    } else if edit_override.is_granted() {
        EditDecision::Overridden {
            status,
            fields: protected,
        }
    } else {
        EditDecision::Denied {
            status,
            fields: protected,
        }
    }
}

/// Fails with `EditForbidden` when the edit is denied.
pub fn assert_editable(
    status: BookingStatus,
    changed_fields: &[BookingField],
    edit_override: EditOverride,
) -> Result<(), BookingError> {
    match evaluate(status, changed_fields, edit_override) {
        EditDecision::Denied { status, fields } => Err(BookingError::EditForbidden { status, fields }),
        EditDecision::Allowed | EditDecision::Overridden { .. } => Ok(()),
    }
}
