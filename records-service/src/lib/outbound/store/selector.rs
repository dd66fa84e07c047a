use std::sync::Arc;

use auth::CredentialHasher;
use tokio::sync::RwLock;

use crate::config::StoreConfig;
use crate::domain::identity::models::USERS_COLLECTION;
use crate::domain::identity::seed::demo_identities;
use crate::domain::store::errors::StoreError;
use crate::domain::store::handle::StoreHandle;
use crate::domain::store::models::BackendKind;
use crate::outbound::store::emulated::EmulatedDocumentStore;
use crate::outbound::store::postgres::PostgresDocumentStore;

enum SelectorState {
    Uninitialized,
    Connecting,
    Ready(StoreHandle),
}

/// Chooses the document store once at startup.
///
/// Tries the persistent adapter first and downgrades to the emulated store
/// when it cannot be reached. The downgrade is one-way: a backend that comes
/// back later is not picked up until the process restarts.
pub struct StoreSelector {
    state: RwLock<SelectorState>,
}

impl Default for StoreSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreSelector {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SelectorState::Uninitialized),
        }
    }

    /// Select and initialize the backend.
    ///
    /// # Arguments
    /// * `config` - Store section of the configuration
    /// * `hasher` - Hasher for the demonstration identities of the emulated store
    ///
    /// # Returns
    /// Kind of the backend now active
    ///
    /// # Errors
    /// * `AlreadyConnected` - Called more than once
    /// * `Unavailable` - Persistent store unreachable and fallback disabled
    pub async fn connect(
        &self,
        config: &StoreConfig,
        hasher: &CredentialHasher,
    ) -> Result<BackendKind, StoreError> {
        {
            let mut state = self.state.write().await;
            if !matches!(*state, SelectorState::Uninitialized) {
                return Err(StoreError::AlreadyConnected);
            }
            *state = SelectorState::Connecting;
        }

        let selected = self.select(config, hasher).await;

        let mut state = self.state.write().await;
        match selected {
            Ok(handle) => {
                let kind = handle.kind();
                *state = SelectorState::Ready(handle);
                tracing::info!(backend = %kind, "Document store ready");
                Ok(kind)
            }
            Err(e) => {
                *state = SelectorState::Uninitialized;
                Err(e)
            }
        }
    }

    async fn select(
        &self,
        config: &StoreConfig,
        hasher: &CredentialHasher,
    ) -> Result<StoreHandle, StoreError> {
        let Some(url) = config.url.as_deref() else {
            tracing::info!("No store url configured, using emulated store");
            return Self::emulated(config, hasher);
        };

        match PostgresDocumentStore::connect(url, config.connect_timeout()).await {
            Ok(store) => Ok(StoreHandle::new(Arc::new(store))),
            Err(e) if config.fallback_to_emulated => {
                tracing::warn!(
                    error = %e,
                    fallback = "emulated",
                    "Persistent store unavailable, falling back to emulated store"
                );
                Self::emulated(config, hasher)
            }
            Err(e) => {
                tracing::error!(error = %e, "Persistent store unavailable and fallback disabled");
                Err(e)
            }
        }
    }

    fn emulated(
        config: &StoreConfig,
        hasher: &CredentialHasher,
    ) -> Result<StoreHandle, StoreError> {
        let store = if config.seed_demo_identities {
            let users = demo_identities(hasher).map_err(|e| StoreError::Backend(e.to_string()))?;
            tracing::info!(count = users.len(), "Seeding demonstration identities");
            EmulatedDocumentStore::seeded([(USERS_COLLECTION.to_string(), users)])?
        } else {
            EmulatedDocumentStore::new()
        };

        Ok(StoreHandle::new(Arc::new(store)))
    }

    /// Handle to the active store.
    ///
    /// # Panics
    /// If called before [`StoreSelector::connect`] succeeded.
    pub async fn get_store(&self) -> StoreHandle {
        match &*self.state.read().await {
            SelectorState::Ready(handle) => handle.clone(),
            SelectorState::Uninitialized | SelectorState::Connecting => {
                panic!("document store requested before StoreSelector::connect completed")
            }
        }
    }

    /// Release the active backend, if any.
    pub async fn shutdown(&self) {
        if let SelectorState::Ready(handle) = &*self.state.read().await {
            handle.close().await;
            tracing::info!(backend = %handle.kind(), "Document store closed");
        }
    }
}
