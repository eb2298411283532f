//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and infrastructure traits
//! that form the vocabulary of the workshop domain.

mod auth;
mod command;
mod errors;
mod events;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, StaffRole};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{BookingId, PartId, ServiceId, UpsellId, UserId};
pub use money::{Money, MAX_AMOUNT_CENTS};
pub use state_machine::{InvalidTransition, StateMachine};
pub use timestamp::Timestamp;
