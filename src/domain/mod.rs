//! Domain layer - Pure business logic with no external dependencies.
//!
//! - `foundation` - Shared value objects, identifiers and event infrastructure
//! - `booking` - Booking lifecycle, upsells, edit guard and cost aggregation

pub mod booking;
pub mod foundation;
