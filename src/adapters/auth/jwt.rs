//! HS256 JWT session validator.
//!
//! Validates bearer tokens signed with a shared secret and maps the
//! `sub`, `username` and `role` claims onto an `AuthenticatedUser`.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, StaffRole, UserId};
use crate::ports::SessionValidator;

/// Claims carried by a workshop access token.
#[derive(Debug, Deserialize)]
struct StaffClaims {
    sub: String,
    username: String,
    #[serde(default)]
    role: StaffRole,
    #[allow(dead_code)]
    exp: u64,
}

/// Validates HS256 tokens against a shared secret.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    /// Creates a validator; `issuer` is enforced when set.
    pub fn new(secret: &SecretString, issuer: Option<&str>, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<StaffClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer => {
                        tracing::warn!("Invalid issuer in token");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::warn!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            },
        )?;
        let claims = data.claims;

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid user ID in token: {}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, claims.username, claims.role))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "workshop-test-secret";

    fn secret() -> SecretString {
        SecretString::new(SECRET.to_string())
    }

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    fn token(claims: serde_json::Value, key: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_admin_token() {
        let validator = JwtSessionValidator::new(&secret(), None, 0);
        let jwt = token(
            json!({"sub": "u-1", "username": "sam", "role": "admin", "exp": now() + 600}),
            SECRET,
        );

        let user = validator.validate(&jwt).await.unwrap();
        assert_eq!(user.id.as_str(), "u-1");
        assert_eq!(user.username, "sam");
        assert_eq!(user.role, StaffRole::Admin);
    }

    #[tokio::test]
    async fn missing_role_defaults_to_staff() {
        let validator = JwtSessionValidator::new(&secret(), None, 0);
        let jwt = token(json!({"sub": "u-2", "username": "kim", "exp": now() + 600}), SECRET);

        let user = validator.validate(&jwt).await.unwrap();
        assert_eq!(user.role, StaffRole::Staff);
    }

    #[tokio::test]
    async fn rejects_wrong_signature() {
        let validator = JwtSessionValidator::new(&secret(), None, 0);
        let jwt = token(
            json!({"sub": "u-1", "username": "sam", "exp": now() + 600}),
            "other-secret",
        );
        assert_eq!(validator.validate(&jwt).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let validator = JwtSessionValidator::new(&secret(), None, 0);
        let jwt = token(
            json!({"sub": "u-1", "username": "sam", "exp": now() - 3600}),
            SECRET,
        );
        assert_eq!(validator.validate(&jwt).await, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn enforces_issuer_when_configured() {
        let validator = JwtSessionValidator::new(&secret(), Some("garage-auth"), 0);
        let jwt = token(
            json!({"sub": "u-1", "username": "sam", "iss": "someone-else", "exp": now() + 600}),
            SECRET,
        );
        assert_eq!(validator.validate(&jwt).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let validator = JwtSessionValidator::new(&secret(), None, 0);
        assert_eq!(
            validator.validate("not.a.jwt").await,
            Err(AuthError::InvalidToken)
        );
    }
}
