//! In-memory persistence adapters.

mod booking_store;

pub use booking_store::InMemoryBookingStore;
