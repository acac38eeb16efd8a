//! Story Service
//!
//! Save and list generated stories through whichever store the bootstrapper
//! produced.

use crate::bootstrap::ClientBootstrapper;
use crate::models::{NewStory, StoryRecord};
use crate::store::{Order, STORIES_TABLE, StoreError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct StoryService {
    bootstrapper: Arc<ClientBootstrapper>,
}

impl StoryService {
    pub fn new(bootstrapper: Arc<ClientBootstrapper>) -> Self {
        Self { bootstrapper }
    }

    /// Stores a generated story payload in the `stories` table.
    pub async fn save_story(&self, story: &Value) -> Result<StoryRecord, StoreError> {
        let config = self.bootstrapper.config().ready().await;
        if !config.enable_storage {
            warn!("Story storage is disabled; not saving");
            return Err(StoreError::StorageDisabled);
        }

        let store = self.bootstrapper.get_client().await;
        let new_story = NewStory::from_generated(story);
        info!(title = %new_story.title, store = %store.kind(), "Saving story");

        match store.insert(STORIES_TABLE, &new_story).await {
            Ok(record) => {
                info!(id = %record.id, "Story saved");
                Ok(record)
            }
            Err(e) => {
                error!(error = %e, "Error saving story");
                Err(e)
            }
        }
    }

    /// All stored stories, newest first.
    pub async fn get_stories(&self) -> Result<Vec<StoryRecord>, StoreError> {
        let store = self.bootstrapper.get_client().await;
        match store.select(STORIES_TABLE, &Order::newest_first()).await {
            Ok(stories) => {
                info!(count = stories.len(), store = %store.kind(), "Retrieved stories");
                Ok(stories)
            }
            Err(e) => {
                error!(error = %e, "Error fetching stories");
                Err(e)
            }
        }
    }
}
