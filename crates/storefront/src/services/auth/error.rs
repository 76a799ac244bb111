//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] vitrine_core::EmailError),

    /// Wrong password, or no account with this email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sign-up password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// An account with this email already exists.
    #[error("email already in use")]
    EmailAlreadyInUse,

    /// Password rejected by the provider's policy.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The provider could not be reached.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// The account was created but its profile document was not.
    #[error("failed to create profile: {0}")]
    ProfileSetup(#[source] RepositoryError),

    /// Any other provider failure.
    #[error("authentication failed: {0}")]
    Unknown(String),
}
