//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token validation (JWT, mock)
//! - `events` - Event publishers (in-memory, tracing)
//! - `http` - axum REST API
//! - `memory` - In-memory booking store
//! - `postgres` - PostgreSQL booking store

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use events::{InMemoryEventBus, TracingEventPublisher};
pub use memory::InMemoryBookingStore;
pub use postgres::PostgresBookingRepository;
