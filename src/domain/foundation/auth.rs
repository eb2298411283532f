//! Authentication types for the domain layer.
//!
//! These types represent an authenticated staff member extracted from a
//! bearer token. Any token validator can populate them via the
//! `SessionValidator` port.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::UserId;

/// Role of a workshop user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    #[default]
    Staff,
}

impl StaffRole {
    /// Only admins may push edits through the edit guard on closed bookings.
    pub fn can_override_edit_guard(&self) -> bool {
        matches!(self, StaffRole::Admin)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffRole::Admin => write!(f, "admin"),
            StaffRole::Staff => write!(f, "staff"),
        }
    }
}

/// Authenticated user extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier (`sub` claim).
    pub id: UserId,

    /// Login name, used for display and audit logs.
    pub username: String,

    pub role: StaffRole,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, username: impl Into<String>, role: StaffRole) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The validator could not be reached or is misconfigured.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}
