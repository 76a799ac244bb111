//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ClientError` type for screen-level operations. Failures
//! that point at the backend (store, mapping, configuration) are captured to
//! Sentry by [`ClientError::report`]; user mistakes are only logged.

use thiserror::Error;
use vitrine_core::CardItemError;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Client-level error type for the storefront.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Document store operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Carousel or card operation rejected.
    #[error("Card error: {0}")]
    Card(#[from] CardItemError),
}

impl ClientError {
    /// Whether the error indicates a backend or data problem rather than a user
    /// mistake.
    #[must_use]
    pub fn is_server_side(&self) -> bool {
        match self {
            Self::Repository(_) | Self::Config(_) => true,
            Self::Auth(err) => matches!(err, AuthError::ProfileSetup(_) | AuthError::Unknown(_)),
            Self::Card(_) => false,
        }
    }

    /// Log the error, capturing backend failures to Sentry.
    pub fn report(&self) {
        if self.is_server_side() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Client error"
            );
        } else {
            tracing::warn!(error = %self, "Client error");
        }
    }

    /// Short message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Repository(RepositoryError::NotFound(_)) => "Profile not found".to_string(),
            Self::Repository(_) | Self::Config(_) => {
                "Something went wrong, please try again".to_string()
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Wrong email or password".to_string(),
                AuthError::PasswordMismatch => "Passwords do not match".to_string(),
                AuthError::EmailAlreadyInUse => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::NetworkError(_) => "No connection, please try again".to_string(),
                AuthError::NotSignedIn => "Please sign in".to_string(),
                _ => "Authentication error".to_string(),
            },
            Self::Card(err) => err.to_string(),
        }
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("favorites", "Added product to favorites", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
