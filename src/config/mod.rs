//! Application configuration module
//!
//! Configuration is loaded from environment variables with the
//! `GARAGE_WORKSHOP` prefix; nested values use `__` as the separator.
//!
//! # Example
//!
//! ```no_run
//! use garage_workshop::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod server;

pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_BYTES};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Prefix for every configuration environment variable.
pub const ENV_PREFIX: &str = "GARAGE_WORKSHOP";

/// Root application configuration
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection and pool
    pub database: DatabaseConfig,

    /// Bearer token verification
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `.env` if present, then `GARAGE_WORKSHOP__*` variables:
    ///
    /// - `GARAGE_WORKSHOP__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GARAGE_WORKSHOP__DATABASE__URL=...` -> `database.url = ...`
    /// - `GARAGE_WORKSHOP__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "GARAGE_WORKSHOP__DATABASE__URL",
        "GARAGE_WORKSHOP__AUTH__JWT_SECRET",
        "GARAGE_WORKSHOP__SERVER__PORT",
        "GARAGE_WORKSHOP__SERVER__ENVIRONMENT",
    ];

    fn set_minimal_env() {
        env::set_var(
            "GARAGE_WORKSHOP__DATABASE__URL",
            "postgres://workshop@localhost/garage",
        );
        env::set_var("GARAGE_WORKSHOP__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn loads_minimal_environment() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.database.url, "postgres://workshop@localhost/garage");
        assert_eq!(config.auth.jwt_secret.expose_secret(), "dev-secret");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_port_is_read() {
        let config = load_with(&[("GARAGE_WORKSHOP__SERVER__PORT", "3000")]).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn production_rejects_short_secret() {
        let config = load_with(&[("GARAGE_WORKSHOP__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::JwtSecretTooShort(_))
        ));
    }
}
