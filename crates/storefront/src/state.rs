//! Client state shared across screens.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::db::{CatalogRepository, FavoritesRepository, ProfileRepository};
use crate::services::auth::{AuthProvider, AuthSessionGateway};
use crate::store::DocumentStore;

/// Client state shared across all screens.
///
/// This struct is cheaply cloneable via `Arc` and wires the repositories and
/// the auth gateway to one document store and one auth provider.
#[derive(Clone)]
pub struct ClientState {
    inner: Arc<ClientStateInner>,
}

struct ClientStateInner {
    config: ClientConfig,
    auth: AuthSessionGateway,
    catalog: CatalogRepository,
    favorites: FavoritesRepository,
    profiles: ProfileRepository,
}

impl ClientState {
    /// Create a new client state.
    ///
    /// # Arguments
    ///
    /// * `config` - Client configuration
    /// * `store` - Document store capability
    /// * `auth` - Authentication provider capability
    #[must_use]
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let catalog = CatalogRepository::new(Arc::clone(&store), &config.products_collection);
        let favorites = FavoritesRepository::new(
            Arc::clone(&store),
            &config.users_collection,
            &config.products_collection,
            config.favorites_batch_size,
        );
        let profiles = ProfileRepository::new(store, &config.users_collection);
        let auth = AuthSessionGateway::new(auth, profiles.clone());

        Self {
            inner: Arc::new(ClientStateInner {
                config,
                auth,
                catalog,
                favorites,
                profiles,
            }),
        }
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the auth session gateway.
    #[must_use]
    pub fn auth(&self) -> &AuthSessionGateway {
        &self.inner.auth
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogRepository {
        &self.inner.catalog
    }

    #[must_use]
    pub fn favorites(&self) -> &FavoritesRepository {
        &self.inner.favorites
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileRepository {
        &self.inner.profiles
    }
}
