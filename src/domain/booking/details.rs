//! Descriptive booking fields and the inputs that set them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

pub const MAX_VEHICLE_REG_NO_LENGTH: usize = 20;
pub const MAX_MAKE_MODEL_LENGTH: usize = 100;
pub const MAX_OWNER_NAME_LENGTH: usize = 100;
pub const MAX_OWNER_ADDRESS_LENGTH: usize = 250;
pub const MAX_OWNER_POSTAL_CODE_LENGTH: usize = 20;
pub const MAX_OWNER_CONTACT_LENGTH: usize = 50;
pub const MAX_REMARKS_LENGTH: usize = 500;

/// Vehicle, owner and scheduling details of a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub vehicle_reg_no: String,
    pub make_model: String,
    pub owner_name: String,
    pub owner_address: Option<String>,
    pub owner_postal_code: Option<String>,
    pub owner_contact: Option<String>,
    pub scheduled_date: Timestamp,
    pub remarks: Option<String>,
}

/// Raw input for a new booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingInput {
    pub vehicle_reg_no: String,
    pub make_model: String,
    pub owner_name: String,
    pub owner_address: Option<String>,
    pub owner_postal_code: Option<String>,
    pub owner_contact: Option<String>,
    pub scheduled_date: Timestamp,
    pub remarks: Option<String>,
    pub prebooking_services: Vec<String>,
    pub confirmed_services: Vec<String>,
    pub confirmed_parts: Vec<String>,
    pub prebooking_labour_cost: i64,
    pub prebooking_parts_cost: i64,
    pub prebooking_booking_price: i64,
}

/// Partial update of a booking; `None` leaves the field unchanged.
///
/// For optional text fields a blank string clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPatch {
    pub vehicle_reg_no: Option<String>,
    pub make_model: Option<String>,
    pub owner_name: Option<String>,
    pub owner_address: Option<String>,
    pub owner_postal_code: Option<String>,
    pub owner_contact: Option<String>,
    pub scheduled_date: Option<Timestamp>,
    pub remarks: Option<String>,
    pub prebooking_services: Option<Vec<String>>,
    pub confirmed_services: Option<Vec<String>>,
    pub confirmed_parts: Option<Vec<String>>,
    pub prebooking_labour_cost: Option<i64>,
    pub prebooking_parts_cost: Option<i64>,
    pub prebooking_booking_price: Option<i64>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        self.vehicle_reg_no.is_none()
            && self.make_model.is_none()
            && self.owner_name.is_none()
            && self.owner_address.is_none()
            && self.owner_postal_code.is_none()
            && self.owner_contact.is_none()
            && self.scheduled_date.is_none()
            && self.remarks.is_none()
            && self.prebooking_services.is_none()
            && self.confirmed_services.is_none()
            && self.confirmed_parts.is_none()
            && self.prebooking_labour_cost.is_none()
            && self.prebooking_parts_cost.is_none()
            && self.prebooking_booking_price.is_none()
    }
}

impl BookingDetails {
    /// Validates the descriptive part of a new booking.
    pub fn from_input(input: &BookingInput) -> Result<Self, ValidationError> {
        Ok(Self {
            vehicle_reg_no: required_text(
                "vehicle_reg_no",
                &input.vehicle_reg_no,
                MAX_VEHICLE_REG_NO_LENGTH,
            )?,
            make_model: required_text("make_model", &input.make_model, MAX_MAKE_MODEL_LENGTH)?,
            owner_name: required_text("owner_name", &input.owner_name, MAX_OWNER_NAME_LENGTH)?,
            owner_address: optional_text(
                "owner_address",
                input.owner_address.as_deref(),
                MAX_OWNER_ADDRESS_LENGTH,
            )?,
            owner_postal_code: optional_text(
                "owner_postal_code",
                input.owner_postal_code.as_deref(),
                MAX_OWNER_POSTAL_CODE_LENGTH,
            )?,
            owner_contact: optional_text(
                "owner_contact",
                input.owner_contact.as_deref(),
                MAX_OWNER_CONTACT_LENGTH,
            )?,
            scheduled_date: input.scheduled_date,
            remarks: optional_text("remarks", input.remarks.as_deref(), MAX_REMARKS_LENGTH)?,
        })
    }
}

/// Trims and checks a mandatory text field.
pub(crate) fn required_text(field: &str, raw: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank becomes `None`.
pub(crate) fn optional_text(
    field: &str,
    raw: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => {
            check_length(field, trimmed, max)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::too_long(field, max, len));
    }
    Ok(())
}
