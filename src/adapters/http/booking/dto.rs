//! HTTP DTOs for booking endpoints.
//!
//! Amounts travel as integer minor units (cents). Timestamps are RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::booking::{
    Booking, BookingInput, BookingPatch, BookingStatus, CostEstimate, RecomputedTotals, Upsell,
    UpsellInput, UpsellPatch,
};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::ports::{BookingList, BookingListOptions, DEFAULT_PAGE_LIMIT};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_reg_no: String,
    pub make_model: String,
    pub owner_name: String,
    #[serde(default)]
    pub owner_address: Option<String>,
    #[serde(default)]
    pub owner_postal_code: Option<String>,
    #[serde(default)]
    pub owner_contact: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub prebooking_services: Vec<String>,
    #[serde(default)]
    pub confirmed_services: Vec<String>,
    #[serde(default)]
    pub confirmed_parts: Vec<String>,
    #[serde(default)]
    pub prebooking_labour_cost: i64,
    #[serde(default)]
    pub prebooking_parts_cost: i64,
    #[serde(default)]
    pub prebooking_booking_price: i64,
}

impl From<CreateBookingRequest> for BookingInput {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            vehicle_reg_no: req.vehicle_reg_no,
            make_model: req.make_model,
            owner_name: req.owner_name,
            owner_address: req.owner_address,
            owner_postal_code: req.owner_postal_code,
            owner_contact: req.owner_contact,
            scheduled_date: Timestamp::from_datetime(req.scheduled_date),
            remarks: req.remarks,
            prebooking_services: req.prebooking_services,
            confirmed_services: req.confirmed_services,
            confirmed_parts: req.confirmed_parts,
            prebooking_labour_cost: req.prebooking_labour_cost,
            prebooking_parts_cost: req.prebooking_parts_cost,
            prebooking_booking_price: req.prebooking_booking_price,
        }
    }
}

/// Request to update booking fields. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookingRequest {
    pub vehicle_reg_no: Option<String>,
    pub make_model: Option<String>,
    pub owner_name: Option<String>,
    pub owner_address: Option<String>,
    pub owner_postal_code: Option<String>,
    pub owner_contact: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    pub prebooking_services: Option<Vec<String>>,
    pub confirmed_services: Option<Vec<String>>,
    pub confirmed_parts: Option<Vec<String>>,
    pub prebooking_labour_cost: Option<i64>,
    pub prebooking_parts_cost: Option<i64>,
    pub prebooking_booking_price: Option<i64>,
    /// Ask to bypass the edit guard on a closed booking (admins only).
    #[serde(default)]
    pub override_guard: bool,
}

impl UpdateBookingRequest {
    pub fn into_patch(self) -> (BookingPatch, bool) {
        let patch = BookingPatch {
            vehicle_reg_no: self.vehicle_reg_no,
            make_model: self.make_model,
            owner_name: self.owner_name,
            owner_address: self.owner_address,
            owner_postal_code: self.owner_postal_code,
            owner_contact: self.owner_contact,
            scheduled_date: self.scheduled_date.map(Timestamp::from_datetime),
            remarks: self.remarks,
            prebooking_services: self.prebooking_services,
            confirmed_services: self.confirmed_services,
            confirmed_parts: self.confirmed_parts,
            prebooking_labour_cost: self.prebooking_labour_cost,
            prebooking_parts_cost: self.prebooking_parts_cost,
            prebooking_booking_price: self.prebooking_booking_price,
        };
        (patch, self.override_guard)
    }
}

/// Request to move a booking to another status.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionStatusRequest {
    pub status: String,
}

/// Request to add an upsell.
#[derive(Debug, Clone, Deserialize)]
pub struct AddUpsellRequest {
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub parts: Vec<String>,
    #[serde(default)]
    pub labour_cost: i64,
    #[serde(default)]
    pub parts_cost: i64,
    #[serde(default)]
    pub upsell_price: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub override_guard: bool,
}

impl AddUpsellRequest {
    pub fn into_input(self) -> (UpsellInput, bool) {
        let input = UpsellInput {
            services: self.services,
            parts: self.parts,
            labour_cost: self.labour_cost,
            parts_cost: self.parts_cost,
            upsell_price: self.upsell_price,
            description: self.description,
        };
        (input, self.override_guard)
    }
}

/// Request to update an upsell. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUpsellRequest {
    pub services: Option<Vec<String>>,
    pub parts: Option<Vec<String>>,
    pub labour_cost: Option<i64>,
    pub parts_cost: Option<i64>,
    pub upsell_price: Option<i64>,
    pub description: Option<String>,
    #[serde(default)]
    pub override_guard: bool,
}

impl UpdateUpsellRequest {
    pub fn into_patch(self) -> (UpsellPatch, bool) {
        let patch = UpsellPatch {
            services: self.services,
            parts: self.parts,
            labour_cost: self.labour_cost,
            parts_cost: self.parts_cost,
            upsell_price: self.upsell_price,
            description: self.description,
        };
        (patch, self.override_guard)
    }
}

/// Query parameters for removing an upsell.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideQuery {
    #[serde(default)]
    pub override_guard: bool,
}

/// Query parameters for listing bookings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_dir: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub vehicle_reg_no: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
}

impl ListBookingsQuery {
    /// Parses the raw parameters, applying defaults for anything absent.
    pub fn into_options(self) -> Result<BookingListOptions, ValidationError> {
        let mut options = BookingListOptions {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            ..Default::default()
        };
        if let Some(sort_by) = self.sort_by {
            options.sort_by = sort_by.parse()?;
        }
        if let Some(sort_dir) = self.sort_dir {
            options.sort_dir = sort_dir.parse()?;
        }
        if let Some(status) = self.status {
            options.status = Some(status.parse::<BookingStatus>()?);
        }
        options.vehicle_reg_no = self.vehicle_reg_no.filter(|s| !s.trim().is_empty());
        options.owner_name = self.owner_name.filter(|s| !s.trim().is_empty());
        Ok(options)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Prebooking estimate as captured at booking time.
#[derive(Debug, Clone, Serialize)]
pub struct CostEstimateResponse {
    pub labour_cost: i64,
    pub parts_cost: i64,
    pub booking_price: i64,
}

impl From<&CostEstimate> for CostEstimateResponse {
    fn from(estimate: &CostEstimate) -> Self {
        Self {
            labour_cost: estimate.labour_cost.cents(),
            parts_cost: estimate.parts_cost.cents(),
            booking_price: estimate.booking_price.cents(),
        }
    }
}

/// Aggregated totals plus reporting figures.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsResponse {
    pub labour_cost: i64,
    pub parts_cost: i64,
    pub booking_price: i64,
    pub services: Vec<String>,
    pub parts: Vec<String>,
    pub total_services: usize,
    pub total_parts: usize,
    pub total_expense: i64,
    pub profit: i64,
    pub profit_percentage: f64,
}

impl From<&RecomputedTotals> for TotalsResponse {
    fn from(totals: &RecomputedTotals) -> Self {
        Self {
            labour_cost: totals.labour_cost.cents(),
            parts_cost: totals.parts_cost.cents(),
            booking_price: totals.booking_price.cents(),
            services: totals.services.iter().map(ToString::to_string).collect(),
            parts: totals.parts.iter().map(ToString::to_string).collect(),
            total_services: totals.total_services,
            total_parts: totals.total_parts,
            total_expense: totals.total_expense().cents(),
            profit: totals.profit(),
            profit_percentage: totals.profit_percentage(),
        }
    }
}

/// One upsell line.
#[derive(Debug, Clone, Serialize)]
pub struct UpsellResponse {
    pub id: String,
    pub services: Vec<String>,
    pub parts: Vec<String>,
    pub labour_cost: i64,
    pub parts_cost: i64,
    pub upsell_price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Upsell> for UpsellResponse {
    fn from(upsell: &Upsell) -> Self {
        Self {
            id: upsell.id.to_string(),
            services: upsell.services.iter().map(ToString::to_string).collect(),
            parts: upsell.parts.iter().map(ToString::to_string).collect(),
            labour_cost: upsell.labour_cost.cents(),
            parts_cost: upsell.parts_cost.cents(),
            upsell_price: upsell.upsell_price.cents(),
            description: upsell.description.clone(),
            created_by: upsell.created_by.to_string(),
            updated_by: upsell.updated_by.to_string(),
            created_at: rfc3339(&upsell.created_at),
            updated_at: rfc3339(&upsell.updated_at),
        }
    }
}

/// Full booking view.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub status: BookingStatus,
    pub vehicle_reg_no: String,
    pub make_model: String,
    pub owner_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_contact: Option<String>,
    pub scheduled_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub prebooking: CostEstimateResponse,
    pub prebooking_services: Vec<String>,
    pub confirmed_services: Vec<String>,
    pub confirmed_parts: Vec<String>,
    pub totals: TotalsResponse,
    pub upsells: Vec<UpsellResponse>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrived_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrived_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        let details = booking.details();
        Self {
            id: booking.id().to_string(),
            status: booking.status(),
            vehicle_reg_no: details.vehicle_reg_no.clone(),
            make_model: details.make_model.clone(),
            owner_name: details.owner_name.clone(),
            owner_address: details.owner_address.clone(),
            owner_postal_code: details.owner_postal_code.clone(),
            owner_contact: details.owner_contact.clone(),
            scheduled_date: rfc3339(&details.scheduled_date),
            remarks: details.remarks.clone(),
            prebooking: booking.prebooking().into(),
            prebooking_services: strings(booking.prebooking_services()),
            confirmed_services: strings(booking.confirmed_services()),
            confirmed_parts: strings(booking.confirmed_parts()),
            totals: booking.totals().into(),
            upsells: booking.upsells().iter().map(Into::into).collect(),
            created_by: booking.created_by().to_string(),
            updated_by: booking.updated_by().to_string(),
            created_at: rfc3339(booking.created_at()),
            updated_at: rfc3339(booking.updated_at()),
            arrived_at: booking.arrived_at().map(rfc3339),
            arrived_by: booking.arrived_by().map(ToString::to_string),
            completed_at: booking.completed_at().map(rfc3339),
            completed_by: booking.completed_by().map(ToString::to_string),
            cancelled_at: booking.cancelled_at().map(rfc3339),
            cancelled_by: booking.cancelled_by().map(ToString::to_string),
        }
    }
}

/// Booking after a field update, with the fields that changed.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateBookingResponse {
    pub changed_fields: Vec<String>,
    pub booking: BookingResponse,
}

/// Booking after an upsell was added.
#[derive(Debug, Clone, Serialize)]
pub struct AddUpsellResponse {
    pub upsell_id: String,
    pub booking: BookingResponse,
}

/// One page of bookings.
#[derive(Debug, Clone, Serialize)]
pub struct BookingListResponse {
    pub items: Vec<BookingResponse>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl From<BookingList> for BookingListResponse {
    fn from(list: BookingList) -> Self {
        Self {
            items: list.items.iter().map(Into::into).collect(),
            total: list.total,
            page: list.page,
            limit: list.limit,
            total_pages: list.total_pages,
        }
    }
}

fn rfc3339(ts: &Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}

fn strings<T: ToString>(items: &[T]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
