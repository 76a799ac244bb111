//! Authentication provider capability.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;
use vitrine_core::{Email, UserUid};

use super::AuthError;

/// A user as known to the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Provider-assigned id.
    pub uid: UserUid,
    /// Account email.
    pub email: Email,
}

/// Errors reported by an [`AuthProvider`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("wrong email or password")]
    WrongCredentials,
    #[error("email already in use")]
    EmailInUse,
    #[error("weak password: {0}")]
    WeakPassword(String),
    #[error("network unavailable: {0}")]
    Network(String),
    #[error("no signed-in user")]
    NoCurrentUser,
    #[error("{0}")]
    Internal(String),
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::WrongCredentials => Self::InvalidCredentials,
            ProviderError::EmailInUse => Self::EmailAlreadyInUse,
            ProviderError::WeakPassword(msg) => Self::WeakPassword(msg),
            ProviderError::Network(msg) => Self::NetworkError(msg),
            ProviderError::NoCurrentUser => Self::NotSignedIn,
            ProviderError::Internal(msg) => Self::Unknown(msg),
        }
    }
}

/// External authentication service.
///
/// The provider keeps its own notion of the current user; the gateway mirrors
/// it as a [`crate::models::Session`].
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticate an existing account.
    async fn sign_in(&self, email: &Email, password: &SecretString)
    -> Result<AuthUser, ProviderError>;

    /// Create an account and sign it in.
    async fn create_user(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthUser, ProviderError>;

    /// The signed-in user, if any.
    async fn current_user(&self) -> Option<AuthUser>;

    /// Sign the current user out.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Delete the signed-in account.
    async fn delete_current_user(&self) -> Result<(), ProviderError>;
}
