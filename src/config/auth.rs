//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Shortest signing secret accepted in production (256 bits for HS256).
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

const MAX_LEEWAY_SECS: u64 = 300;

/// Authentication configuration (HS256 bearer tokens)
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret used to verify staff tokens
    pub jwt_secret: SecretString,

    /// Expected `iss` claim; unchecked when absent
    #[serde(default)]
    pub issuer: Option<String>,

    /// Clock skew tolerated on `exp`, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret_len = self.jwt_secret.expose_secret().len();
        if secret_len == 0 {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production && secret_len < MIN_PRODUCTION_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort(
                MIN_PRODUCTION_SECRET_BYTES,
            ));
        }
        if self.leeway_secs > MAX_LEEWAY_SECS {
            return Err(ValidationError::LeewayTooLarge);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(String::new()),
            issuer: None,
            leeway_secs: default_leeway(),
        }
    }
}

fn default_leeway() -> u64 {
    30
}
