//! Client Bootstrapper
//!
//! Builds the story store on first use, once the runtime configuration is
//! ready. Bad credentials or a failed construction never reach the caller:
//! the bootstrapper degrades to the in-memory store instead.

use crate::config_loader::ConfigLoader;
use crate::runtime_config::RuntimeConfig;
use crate::store::{InMemoryStoryStore, StoryStore, SupabaseStore};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

/// Lazily constructs and caches the process-wide [`StoryStore`] handle.
pub struct ClientBootstrapper {
    config: Arc<ConfigLoader>,
    client: OnceCell<Arc<dyn StoryStore>>,
}

impl ClientBootstrapper {
    pub fn new(config: Arc<ConfigLoader>) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    /// A bootstrapper whose handle is already `store`.
    pub fn with_store(config: Arc<ConfigLoader>, store: Arc<dyn StoryStore>) -> Self {
        Self {
            config,
            client: OnceCell::new_with(Some(store)),
        }
    }

    pub fn config(&self) -> &Arc<ConfigLoader> {
        &self.config
    }

    /// The handle, if it has been built.
    pub fn cached(&self) -> Option<Arc<dyn StoryStore>> {
        self.client.get().cloned()
    }

    /// Returns the store handle, building it on first call.
    ///
    /// Concurrent first callers wait on a single construction and all receive
    /// the same `Arc`.
    pub async fn get_client(&self) -> Arc<dyn StoryStore> {
        self.client
            .get_or_init(|| async {
                let config = self.config.ready().await;
                build_store(&config)
            })
            .await
            .clone()
    }
}

fn build_store(config: &RuntimeConfig) -> Arc<dyn StoryStore> {
    info!(
        database_url = %config.database_url,
        database_key = %config.redacted_key(),
        "Creating database client"
    );

    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(reason) => {
            error!(%reason, "Invalid database credentials. Using mock database client.");
            return Arc::new(InMemoryStoryStore::new());
        }
    };

    match SupabaseStore::new(&credentials) {
        Ok(store) => {
            info!("Database client created successfully");
            Arc::new(store)
        }
        Err(e) => {
            error!(error = %e, "Error creating database client");
            warn!("Falling back to mock database client");
            Arc::new(InMemoryStoryStore::new())
        }
    }
}
