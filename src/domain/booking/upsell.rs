//! Upsell sub-entity embedded in a booking.
//!
//! An upsell is extra work or parts sold after the vehicle arrived. It has
//! its own id and audit trail but never exists outside its booking.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, PartId, ServiceId, Timestamp, UpsellId, UserId};

use super::references::parse_references;
use super::BookingError;

/// Maximum length for an upsell description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Additional paid work recorded against a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upsell {
    pub id: UpsellId,
    pub services: Vec<ServiceId>,
    pub parts: Vec<PartId>,
    /// Internal labour cost.
    pub labour_cost: Money,
    /// Internal parts cost.
    pub parts_cost: Money,
    /// Amount charged to the customer.
    pub upsell_price: Money,
    pub description: Option<String>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Raw input for a new upsell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsellInput {
    pub services: Vec<String>,
    pub parts: Vec<String>,
    pub labour_cost: i64,
    pub parts_cost: i64,
    pub upsell_price: i64,
    pub description: Option<String>,
}

/// Partial update of an upsell; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsellPatch {
    pub services: Option<Vec<String>>,
    pub parts: Option<Vec<String>>,
    pub labour_cost: Option<i64>,
    pub parts_cost: Option<i64>,
    pub upsell_price: Option<i64>,
    pub description: Option<String>,
}

impl UpsellPatch {
    pub fn is_empty(&self) -> bool {
        self.services.is_none()
            && self.parts.is_none()
            && self.labour_cost.is_none()
            && self.parts_cost.is_none()
            && self.upsell_price.is_none()
            && self.description.is_none()
    }
}

impl Upsell {
    /// Validates input and builds a new upsell stamped with `actor`.
    ///
    /// # Errors
    ///
    /// - `InvalidReference` if a service or part id is malformed
    /// - `ValidationFailed` if an amount is negative or the description is too long
    pub fn create(input: UpsellInput, actor: &UserId, now: Timestamp) -> Result<Self, BookingError> {
        let services = parse_references::<ServiceId>("services", &input.services)?;
        let parts = parse_references::<PartId>("parts", &input.parts)?;
        let labour_cost = Money::for_field("labour_cost", input.labour_cost)?;
        let parts_cost = Money::for_field("parts_cost", input.parts_cost)?;
        let upsell_price = Money::for_field("upsell_price", input.upsell_price)?;
        let description = normalize_description(input.description)?;

        Ok(Self {
            id: UpsellId::new(),
            services,
            parts,
            labour_cost,
            parts_cost,
            upsell_price,
            description,
            created_by: actor.clone(),
            updated_by: actor.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns a copy with the patch applied.
    ///
    /// Everything is validated before anything is assigned, so a failing
    /// patch leaves the original untouched.
    pub fn patched(
        &self,
        patch: UpsellPatch,
        actor: &UserId,
        now: Timestamp,
    ) -> Result<Self, BookingError> {
        let mut next = self.clone();
        if let Some(raw) = patch.services {
            next.services = parse_references("services", &raw)?;
        }
        if let Some(raw) = patch.parts {
            next.parts = parse_references("parts", &raw)?;
        }
        if let Some(cents) = patch.labour_cost {
            next.labour_cost = Money::for_field("labour_cost", cents)?;
        }
        if let Some(cents) = patch.parts_cost {
            next.parts_cost = Money::for_field("parts_cost", cents)?;
        }
        if let Some(cents) = patch.upsell_price {
            next.upsell_price = Money::for_field("upsell_price", cents)?;
        }
        if patch.description.is_some() {
            next.description = normalize_description(patch.description)?;
        }
        next.updated_by = actor.clone();
        next.updated_at = now;
        Ok(next)
    }
}

// Blank descriptions are stored as absent.
fn normalize_description(raw: Option<String>) -> Result<Option<String>, BookingError> {
    let Some(text) = raw else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let len = trimmed.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(BookingError::validation(
            "description",
            format!("must be at most {} characters, got {}", MAX_DESCRIPTION_LENGTH, len),
        ));
    }
    Ok(Some(trimmed.to_string()))
}
