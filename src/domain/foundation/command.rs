//! Command infrastructure for CQRS handlers.
//!
//! `CommandMetadata` is the context that flows through command processing:
//! who is acting, and which request the work belongs to. Handlers copy it
//! onto the events they emit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{StaffRole, UserId};

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The staff member executing this command.
    pub user_id: UserId,

    /// Role of the acting user; decides whether edit overrides are honoured.
    pub role: StaffRole,

    /// Links related operations across a single user request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "test").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for a user with the given role.
    pub fn new(user_id: UserId, role: StaffRole) -> Self {
        Self {
            user_id,
            role,
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> UserId {
        UserId::new("staff-1").unwrap()
    }

    #[test]
    fn correlation_id_is_generated_when_missing() {
        let metadata = CommandMetadata::new(staff(), StaffRole::Staff);
        let first = metadata.correlation_id();
        assert!(!first.is_empty());
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn builder_sets_optional_fields() {
        let metadata = CommandMetadata::new(staff(), StaffRole::Admin)
            .with_correlation_id("req-9")
            .with_source("api");

        assert_eq!(metadata.correlation_id(), "req-9");
        assert_eq!(metadata.source(), Some("api"));
        assert_eq!(metadata.role, StaffRole::Admin);
    }
}
