//! Garage Workshop - service booking backend
//!
//! Tracks workshop bookings through their lifecycle (pending, arrived,
//! completed, cancelled), records upsells sold against them and keeps the
//! aggregated labour, parts and price totals consistent on every write.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
