//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINE_PRODUCTS_COLLECTION` - Product collection name (default: products)
//! - `VITRINE_USERS_COLLECTION` - Profile collection name (default: users)
//! - `VITRINE_FAVORITES_BATCH_SIZE` - Ids per favorites "in" query, 1..=100 (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_PRODUCTS_COLLECTION: &str = "products";
const DEFAULT_USERS_COLLECTION: &str = "users";
const DEFAULT_FAVORITES_BATCH_SIZE: usize = 30;
const MAX_FAVORITES_BATCH_SIZE: usize = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
///
/// Implements `Debug` manually to redact the Sentry DSN.
#[derive(Clone)]
pub struct ClientConfig {
    /// Collection holding product records
    pub products_collection: String,
    /// Collection holding one profile document per user
    pub users_collection: String,
    /// Maximum ids per favorites "in" query
    pub favorites_batch_size: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("products_collection", &self.products_collection)
            .field("users_collection", &self.users_collection)
            .field("favorites_batch_size", &self.favorites_batch_size)
            .field(
                "sentry_dsn",
                &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            products_collection: DEFAULT_PRODUCTS_COLLECTION.to_string(),
            users_collection: DEFAULT_USERS_COLLECTION.to_string(),
            favorites_batch_size: DEFAULT_FAVORITES_BATCH_SIZE,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let products_collection = get_optional("VITRINE_PRODUCTS_COLLECTION")
            .unwrap_or_else(|| DEFAULT_PRODUCTS_COLLECTION.to_string());
        let users_collection = get_optional("VITRINE_USERS_COLLECTION")
            .unwrap_or_else(|| DEFAULT_USERS_COLLECTION.to_string());
        let favorites_batch_size = get_optional("VITRINE_FAVORITES_BATCH_SIZE")
            .map_or(Ok(DEFAULT_FAVORITES_BATCH_SIZE), |raw| {
                parse_batch_size("VITRINE_FAVORITES_BATCH_SIZE", &raw)
            })?;

        Ok(Self {
            products_collection,
            users_collection,
            favorites_batch_size,
            sentry_dsn: get_optional("SENTRY_DSN").map(SecretString::from),
            sentry_environment: get_optional("SENTRY_ENVIRONMENT"),
        })
    }
}

/// Parse a batch size in `1..=MAX_FAVORITES_BATCH_SIZE`.
fn parse_batch_size(key: &str, raw: &str) -> Result<usize, ConfigError> {
    let value = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(1..=MAX_FAVORITES_BATCH_SIZE).contains(&value) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 1 and {MAX_FAVORITES_BATCH_SIZE} (got {value})"),
        ));
    }
    Ok(value)
}
