//! Booking reader port (read side / CQRS queries).
//!
//! Listing with filters, sorting and page-based pagination.

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{DomainError, ValidationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default page size.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Reader port for booking queries.
#[async_trait]
pub trait BookingReader: Send + Sync {
    /// List bookings matching the options.
    async fn list(&self, options: &BookingListOptions) -> Result<BookingList, DomainError>;
}

/// Column a booking list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    ScheduledDate,
    OwnerName,
    VehicleRegNo,
    Status,
}

impl BookingSortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingSortField::CreatedAt => "created_at",
            BookingSortField::UpdatedAt => "updated_at",
            BookingSortField::ScheduledDate => "scheduled_date",
            BookingSortField::OwnerName => "owner_name",
            BookingSortField::VehicleRegNo => "vehicle_reg_no",
            BookingSortField::Status => "status",
        }
    }
}

impl FromStr for BookingSortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(BookingSortField::CreatedAt),
            "updated_at" => Ok(BookingSortField::UpdatedAt),
            "scheduled_date" => Ok(BookingSortField::ScheduledDate),
            "owner_name" => Ok(BookingSortField::OwnerName),
            "vehicle_reg_no" => Ok(BookingSortField::VehicleRegNo),
            "status" => Ok(BookingSortField::Status),
            other => Err(ValidationError::invalid_format(
                "sort_by",
                format!("unknown sort field '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ValidationError::invalid_format(
                "sort_dir",
                format!("expected 'asc' or 'desc', got '{}'", other),
            )),
        }
    }
}

/// Options for listing bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingListOptions {
    /// 1-based page number.
    pub page: u32,

    /// Page size, 1..=MAX_PAGE_LIMIT.
    pub limit: u32,

    pub sort_by: BookingSortField,
    pub sort_dir: SortDirection,

    /// Filter by status (None = all statuses).
    pub status: Option<BookingStatus>,

    /// Case-insensitive exact match on registration.
    pub vehicle_reg_no: Option<String>,

    /// Case-insensitive substring match on owner name.
    pub owner_name: Option<String>,
}

impl Default for BookingListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            sort_by: BookingSortField::default(),
            sort_dir: SortDirection::default(),
            status: None,
            vehicle_reg_no: None,
            owner_name: None,
        }
    }
}

impl BookingListOptions {
    /// Number of rows to skip for the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Checks page and limit bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page == 0 {
            return Err(ValidationError::invalid_format("page", "must be at least 1"));
        }
        if self.limit == 0 || self.limit > MAX_PAGE_LIMIT {
            return Err(ValidationError::invalid_format(
                "limit",
                format!("must be between 1 and {}", MAX_PAGE_LIMIT),
            ));
        }
        Ok(())
    }

    /// Returns true if the booking passes every filter.
    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(status) = self.status {
            if booking.status() != status {
                return false;
            }
        }
        if let Some(reg_no) = &self.vehicle_reg_no {
            if !booking
                .details()
                .vehicle_reg_no
                .eq_ignore_ascii_case(reg_no.trim())
            {
                return false;
            }
        }
        if let Some(name) = &self.owner_name {
            let needle = name.trim().to_lowercase();
            if !booking.details().owner_name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// One page of bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingList {
    pub items: Vec<Booking>,

    /// Total number of matching bookings across all pages.
    pub total: u64,

    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl BookingList {
    /// Builds a page, deriving `total_pages` from `total` and `limit`.
    pub fn new(items: Vec<Booking>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}
