//! Application configuration management.
//!
//! Configuration is read once at startup from environment variables, using the `envy` crate
//! to deserialize them into a type-safe struct. Nothing sensitive has a default: the process
//! refuses to start without a database URL and a signing key.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `JWT_SECRET` (required): HMAC key used to sign authorization tokens
/// - `LISTEN_ADDR` (optional): socket address to bind, defaults to `0.0.0.0:5000`
/// - `TOKEN_TTL_SECS` (optional): token lifetime, defaults to 900
/// - `BCRYPT_COST` (optional): password hashing cost, defaults to `bcrypt::DEFAULT_COST`
/// - `REQUEST_TIMEOUT_SECS` (optional): per-request deadline, defaults to 30
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "secret")]
    pub database_url: SecretString,

    #[serde(deserialize_with = "secret")]
    pub jwt_secret: SecretString,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is missing or cannot be parsed.
    #[error("Invalid environment: {0}")]
    Env(#[from] envy::Error),

    #[error("JWT_SECRET must not be empty")]
    EmptySigningKey,

    #[error("TOKEN_TTL_SECS must be greater than zero")]
    ZeroTokenLifetime,

    #[error("BCRYPT_COST must be between 4 and 31")]
    BcryptCostOutOfRange,
}

/// Cost bounds accepted by the bcrypt algorithm.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_token_ttl_secs() -> u64 {
    900
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (`DATABASE_URL`, `JWT_SECRET`)
    /// - Environment variable values cannot be parsed into expected types
    /// - A value is out of its allowed range (see [`Config::validate`])
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave the service insecure or unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ConfigError::EmptySigningKey);
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::ZeroTokenLifetime);
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::BcryptCostOutOfRange);
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> Config {
        Config {
            database_url: SecretString::from("postgres://localhost/bank".to_string()),
            jwt_secret: SecretString::from(secret.to_string()),
            listen_addr: default_listen_addr(),
            token_ttl_secs: default_token_ttl_secs(),
            bcrypt_cost: default_bcrypt_cost(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    #[test]
    fn accepts_complete_config() {
        assert!(config("signing-key").validate().is_ok());
    }

    #[test]
    fn rejects_empty_signing_key() {
        assert!(matches!(
            config("").validate(),
            Err(ConfigError::EmptySigningKey)
        ));
    }

    #[test]
    fn rejects_zero_token_lifetime() {
        let mut config = config("signing-key");
        config.token_ttl_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroTokenLifetime)
        ));
    }

    #[test]
    fn rejects_out_of_range_bcrypt_cost() {
        let mut config = config("signing-key");
        config.bcrypt_cost = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BcryptCostOutOfRange)
        ));
    }
}
