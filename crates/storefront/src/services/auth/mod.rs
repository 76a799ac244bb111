//! Authentication gateway.
//!
//! Wraps the external [`AuthProvider`] and holds the current [`Session`].
//! Lifecycle: unset at start, set by sign-in/sign-up (or [`AuthSessionGateway::restore`]),
//! cleared by sign-out and account deletion.

mod error;
mod memory;
mod provider;

pub use error::AuthError;
pub use memory::{MIN_PASSWORD_LENGTH, MemoryAuthProvider};
pub use provider::{AuthProvider, AuthUser, ProviderError};

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use vitrine_core::Email;

use crate::db::ProfileRepository;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::session::Session;

/// Session holder in front of the auth provider.
pub struct AuthSessionGateway {
    provider: Arc<dyn AuthProvider>,
    profiles: ProfileRepository,
    session: RwLock<Option<Session>>,
}

impl AuthSessionGateway {
    /// Create a gateway with no session.
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>, profiles: ProfileRepository) -> Self {
        Self {
            provider,
            profiles,
            session: RwLock::new(None),
        }
    }

    /// Sign in with email and password.
    ///
    /// The email is lowercased before it reaches the provider.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed,
    /// `AuthError::InvalidCredentials` on a wrong email/password pair and
    /// `AuthError::NetworkError` if the provider is unreachable.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let email = Email::parse(email)?.normalized();

        let user = self.provider.sign_in(&email, password).await.map_err(|e| {
            tracing::warn!(error = %e, "Sign-in failed");
            AuthError::from(e)
        })?;

        Ok(self.establish(user))
    }

    /// Create an account, sign it in and write its default profile.
    ///
    /// If the profile write fails the account still exists and the session
    /// stays set; the error is `AuthError::ProfileSetup`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::PasswordMismatch`,
    /// `AuthError::WeakPassword`, `AuthError::EmailAlreadyInUse`,
    /// `AuthError::NetworkError` or `AuthError::ProfileSetup`.
    #[instrument(skip(self, password, repeat_password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        repeat_password: &SecretString,
    ) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        if password.expose_secret() != repeat_password.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }

        let user = self.provider.create_user(&email, password).await.map_err(|e| {
            tracing::warn!(error = %e, "Sign-up failed");
            AuthError::from(e)
        })?;
        let session = self.establish(user);

        self.profiles.create_default(&session).await.map_err(|e| {
            tracing::error!(uid = %session.uid, error = %e, "Account created without profile");
            AuthError::ProfileSetup(e)
        })?;

        Ok(session)
    }

    /// Adopt the provider's signed-in user, if it still has one.
    pub async fn restore(&self) -> Option<Session> {
        let user = self.provider.current_user().await?;
        Some(self.establish(user))
    }

    /// Sign out. The local session is cleared even if the provider call fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
        self.clear();
    }

    /// Delete the signed-in account from the auth provider.
    ///
    /// The profile document and its favorites are left in the store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a session, or the provider's
    /// failure; the session is kept when deletion fails.
    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> Result<(), AuthError> {
        let session = self.require_session()?;

        self.provider.delete_current_user().await.map_err(|e| {
            tracing::error!(uid = %session.uid, error = %e, "Account deletion failed");
            AuthError::from(e)
        })?;

        self.clear();
        tracing::info!(uid = %session.uid, "Account deleted; profile document left in store");
        Ok(())
    }

    /// The current session, if any.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` if nobody is signed in.
    pub fn require_session(&self) -> Result<Session, AuthError> {
        self.current_session().ok_or(AuthError::NotSignedIn)
    }

    fn establish(&self, user: AuthUser) -> Session {
        let session = Session::new(user.uid, user.email);
        set_sentry_user(&session.uid, Some(session.email.as_str()));
        tracing::info!(uid = %session.uid, "Signed in");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        session
    }

    fn clear(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
        clear_sentry_user();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{DocumentStore, MemoryStore};

    struct Fixture {
        store: Arc<MemoryStore>,
        provider: Arc<MemoryAuthProvider>,
        gateway: AuthSessionGateway,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let provider = Arc::new(MemoryAuthProvider::new());
        let profiles = ProfileRepository::new(store.clone(), "users");
        let gateway = AuthSessionGateway::new(provider.clone(), profiles);
        Fixture {
            store,
            provider,
            gateway,
        }
    }

    fn secret(raw: &str) -> SecretString {
        SecretString::from(raw.to_owned())
    }

    #[tokio::test]
    async fn test_sign_up_creates_default_profile() {
        let f = fixture();
        let session = f
            .gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap();

        assert_eq!(f.gateway.current_session(), Some(session.clone()));
        let doc = f
            .store
            .get("users", session.uid.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.get("email"), Some(&json!("ann@example.com")));
        assert_eq!(doc.get("education"), Some(&json!("Высшее")));
        assert_eq!(doc.get("favorites"), Some(&json!([])));
        assert_eq!(doc.get("name"), Some(&json!("")));
    }

    #[tokio::test]
    async fn test_sign_up_password_mismatch() {
        let f = fixture();
        let err = f
            .gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
        assert_eq!(f.provider.account_count().await, 0);
        assert!(f.gateway.current_session().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_rejects_bad_input() {
        let f = fixture();
        let err = f
            .gateway
            .sign_up("not-an-email", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));

        let err = f
            .gateway
            .sign_up("ann@example.com", &secret("123"), &secret("123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[tokio::test]
    async fn test_sign_up_twice_is_email_in_use() {
        let f = fixture();
        f.gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap();
        let err = f
            .gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailAlreadyInUse));
    }

    #[tokio::test]
    async fn test_profile_failure_keeps_session() {
        let f = fixture();
        f.store.set_offline(true);
        let err = f
            .gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ProfileSetup(_)));
        assert!(f.gateway.current_session().is_some());
    }

    #[tokio::test]
    async fn test_sign_in_lowercases_email() {
        let f = fixture();
        let created = f
            .gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap();
        f.gateway.sign_out().await;

        let session = f
            .gateway
            .sign_in("  ANN@Example.COM ", &secret("secret1"))
            .await
            .unwrap();
        assert_eq!(session.uid, created.uid);
        assert_eq!(session.email.as_str(), "ann@example.com");
    }

    #[tokio::test]
    async fn test_sign_in_failures() {
        let f = fixture();
        f.gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap();
        f.gateway.sign_out().await;

        let err = f
            .gateway
            .sign_in("ann@example.com", &secret("wrong!"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        f.provider.set_offline(true);
        let err = f
            .gateway
            .sign_in("ann@example.com", &secret("secret1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NetworkError(_)));
        assert!(f.gateway.current_session().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let f = fixture();
        f.gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap();
        f.gateway.sign_out().await;

        assert!(f.gateway.current_session().is_none());
        assert!(matches!(
            f.gateway.require_session(),
            Err(AuthError::NotSignedIn)
        ));
        assert!(f.provider.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_delete_account_orphans_profile() {
        let f = fixture();
        let session = f
            .gateway
            .sign_up("ann@example.com", &secret("secret1"), &secret("secret1"))
            .await
            .unwrap();
        f.gateway.delete_account().await.unwrap();

        assert!(f.gateway.current_session().is_none());
        assert_eq!(f.provider.account_count().await, 0);
        assert!(
            f.store
                .get("users", session.uid.as_str())
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_delete_account_requires_session() {
        let f = fixture();
        let err = f.gateway.delete_account().await.unwrap_err();
        assert!(matches!(err, AuthError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_restore_adopts_provider_user() {
        let f = fixture();
        assert!(f.gateway.restore().await.is_none());

        let created = f
            .provider
            .create_user(
                &Email::parse("bob@example.com").unwrap(),
                &secret("secret1"),
            )
            .await
            .unwrap();
        let restored = f.gateway.restore().await.unwrap();
        assert_eq!(restored.uid, created.uid);
        assert_eq!(f.gateway.current_session(), Some(restored));
    }
}
