//! Shared application state

use crate::{
    config::{Config, StorageBackend},
    db::{InMemoryListingStore, ListingStore, PostgresListingStore},
    services::ListingService,
    Result,
};
use std::sync::Arc;

/// Handles shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ListingStore>,
    pub listings: ListingService,
}

impl AppState {
    /// Open the configured storage backend, running migrations when enabled.
    pub async fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn ListingStore> = match config.database.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory listing storage; listings are lost on restart");
                Arc::new(InMemoryListingStore::new())
            }
            StorageBackend::Postgres => {
                let store = PostgresListingStore::connect(&config.database).await?;
                if config.database.run_migrations {
                    store.migrate().await?;
                }
                Arc::new(store)
            }
        };
        Ok(Self::with_store(config, store))
    }

    /// State over an existing store.
    pub fn with_store(config: Config, store: Arc<dyn ListingStore>) -> Self {
        Self {
            config: Arc::new(config),
            listings: ListingService::new(Arc::clone(&store)),
            store,
        }
    }

    /// Release storage resources. Call once after the server stops.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}
