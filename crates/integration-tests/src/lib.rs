//! End-to-end tests for the Vitrine storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! Every flow runs against the in-memory document store and auth provider, so
//! no external services are needed.
//!
//! # Test Categories
//!
//! - `catalog_flow` - catalog fetch, mapping and search
//! - `favorites_flow` - favorite toggles and resolution
//! - `account_flow` - sign-up, profile editing and account lifecycle

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value, json};
use vitrine_storefront::config::ClientConfig;
use vitrine_storefront::models::Session;
use vitrine_storefront::services::auth::{AuthError, MemoryAuthProvider};
use vitrine_storefront::state::ClientState;
use vitrine_storefront::store::{Document, MemoryStore};

/// Password used by every test account.
pub const TEST_PASSWORD: &str = "secret123";

/// A client wired to fresh in-memory capabilities.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub auth: Arc<MemoryAuthProvider>,
    pub state: ClientState,
}

impl TestContext {
    /// Build a context with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Build a context with `config`, sizing the store's "in" query ceiling
    /// to the configured batch size.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let store = Arc::new(MemoryStore::with_in_query_limit(config.favorites_batch_size));
        let auth = Arc::new(MemoryAuthProvider::new());
        let state = ClientState::new(config, store.clone(), auth.clone());
        Self { store, auth, state }
    }

    /// Register `email` and return its session.
    ///
    /// # Errors
    ///
    /// Returns the gateway's sign-up error.
    pub async fn sign_up(&self, email: &str) -> Result<Session, AuthError> {
        let password = password();
        self.state.auth().sign_up(email, &password, &password).await
    }

    /// Add a well-formed product record and return its store document id.
    pub async fn add_product(&self, id: &str, name: &str) -> String {
        self.add_raw_product(json!({
            "id": id,
            "name": name,
            "cost": "10",
            "description": format!("About {name}"),
            "images": [format!("https://img.example/{id}/1.png"), format!("https://img.example/{id}/2.png")]
        }))
        .await
    }

    /// Add an arbitrary product record.
    pub async fn add_raw_product(&self, value: Value) -> String {
        let collection = self.state.config().products_collection.clone();
        self.store.add(&collection, object(value)).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The shared test password.
#[must_use]
pub fn password() -> SecretString {
    SecretString::from(TEST_PASSWORD.to_owned())
}

/// Convert a JSON object literal into a [`Document`]; anything else is empty.
#[must_use]
pub fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}
