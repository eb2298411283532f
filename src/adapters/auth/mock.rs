//! Mock session validator for testing.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_staff("staff-token", "staff-1")
//!     .with_admin("admin-token", "admin-1");
//!
//! let user = validator.validate("admin-token").await?;
//! assert!(user.is_admin());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, StaffRole, UserId};
use crate::ports::SessionValidator;

/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error to return for all validations.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a token for a staff member with the given id.
    pub fn with_staff(self, token: impl Into<String>, user_id: &str) -> Self {
        let user = test_user(user_id, StaffRole::Staff);
        self.with_user(token, user)
    }

    /// Adds a token for an admin with the given id.
    pub fn with_admin(self, token: impl Into<String>, user_id: &str) -> Self {
        let user = test_user(user_id, StaffRole::Admin);
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .expect("MockSessionValidator: error lock poisoned") = Some(error);
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .expect("MockSessionValidator: tokens lock poisoned")
            .insert(token.into(), user);
    }
}

fn test_user(user_id: &str, role: StaffRole) -> AuthenticatedUser {
    let id = UserId::new(user_id).unwrap_or_else(|_| panic!("invalid test user id '{}'", user_id));
    AuthenticatedUser::new(id, format!("{}-login", user_id), role)
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .expect("MockSessionValidator: error lock poisoned")
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .expect("MockSessionValidator: tokens lock poisoned")
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_tokens_resolve_with_roles() {
        let validator = MockSessionValidator::new()
            .with_staff("s", "staff-1")
            .with_admin("a", "admin-1");

        assert_eq!(validator.validate("s").await.unwrap().role, StaffRole::Staff);
        assert!(validator.validate("a").await.unwrap().is_admin());
    }

    #[tokio::test]
    async fn unknown_token_is_invalid() {
        let validator = MockSessionValidator::new();
        assert_eq!(validator.validate("nope").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let validator = MockSessionValidator::new()
            .with_staff("s", "staff-1")
            .with_error(AuthError::ServiceUnavailable("down".into()));
        assert!(matches!(
            validator.validate("s").await,
            Err(AuthError::ServiceUnavailable(_))
        ));
    }
}
