//! Booking domain module.
//!
//! Handles the booking lifecycle (pending, arrived, completed, cancelled),
//! the embedded upsell ledger, the edit guard for closed bookings and the
//! cost aggregation that keeps derived totals authoritative.
//!
//! # Events
//!
//! - `BookingCreated` - Published when a booking is taken
//! - `BookingDetailsUpdated` - Published when fields are edited
//! - `BookingStatusChanged` - Published on every lifecycle transition
//! - `UpsellAdded` / `UpsellUpdated` / `UpsellRemoved` - Upsell ledger changes

mod aggregate;
mod details;
pub mod edit_guard;
mod errors;
mod events;
mod references;
mod status;
pub mod totals;
mod upsell;

pub use aggregate::Booking;
pub use details::{
    BookingDetails, BookingInput, BookingPatch, MAX_OWNER_ADDRESS_LENGTH, MAX_OWNER_NAME_LENGTH,
    MAX_OWNER_POSTAL_CODE_LENGTH, MAX_REMARKS_LENGTH,
};
pub use edit_guard::{BookingField, EditDecision, EditOverride};
pub use errors::BookingError;
pub use events::{
    BookingCreated, BookingDetailsUpdated, BookingStatusChanged, UpsellAdded, UpsellRemoved,
    UpsellUpdated,
};
pub use status::BookingStatus;
pub use totals::{CostEstimate, RecomputedTotals};
pub use upsell::{Upsell, UpsellInput, UpsellPatch};
