//! In-process auth provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use vitrine_core::{Email, UserUid};

use super::provider::{AuthProvider, AuthUser, ProviderError};

/// Minimum password length accepted by the provider.
pub const MIN_PASSWORD_LENGTH: usize = 6;

struct Account {
    user: AuthUser,
    password_hash: String,
}

/// Auth provider backed by an in-memory account table.
///
/// Emails are matched case-insensitively. Passwords are stored as Argon2id
/// hashes. [`Self::set_offline`] makes every call fail with a network error.
#[derive(Default)]
pub struct MemoryAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<AuthUser>>,
    offline: AtomicBool,
}

impl MemoryAuthProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing (or regaining) connectivity.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of registered accounts.
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    fn ensure_online(&self) -> Result<(), ProviderError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProviderError::Network("auth service unreachable".to_owned()));
        }
        Ok(())
    }
}

fn account_key(email: &Email) -> String {
    email.normalized().into_inner()
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthUser, ProviderError> {
        self.ensure_online()?;
        let user = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(&account_key(email))
                .ok_or(ProviderError::WrongCredentials)?;
            verify_password(password.expose_secret(), &account.password_hash)?;
            account.user.clone()
        };
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    async fn create_user(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthUser, ProviderError> {
        self.ensure_online()?;
        validate_password(password.expose_secret())?;

        let key = account_key(email);
        let user = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&key) {
                return Err(ProviderError::EmailInUse);
            }
            let user = AuthUser {
                uid: UserUid::new(uuid::Uuid::new_v4().simple().to_string()),
                email: email.clone(),
            };
            let password_hash = hash_password(password.expose_secret())?;
            accounts.insert(
                key,
                Account {
                    user: user.clone(),
                    password_hash,
                },
            );
            user
        };
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    async fn current_user(&self) -> Option<AuthUser> {
        self.current.read().await.clone()
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.ensure_online()?;
        *self.current.write().await = None;
        Ok(())
    }

    async fn delete_current_user(&self) -> Result<(), ProviderError> {
        self.ensure_online()?;
        let user = self
            .current
            .write()
            .await
            .take()
            .ok_or(ProviderError::NoCurrentUser)?;
        self.accounts.write().await.remove(&account_key(&user.email));
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), ProviderError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ProviderError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, ProviderError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ProviderError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), ProviderError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| ProviderError::WrongCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ProviderError::WrongCredentials)
}
