use super::{Order, STORIES_TABLE, StoreError, StoreKind, StoryStore};
use crate::models::{NewStory, StoryRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Append-only, process-local stand-in for the hosted database.
///
/// Only the `stories` table exists. Rows are never updated or deleted.
#[derive(Default)]
pub struct InMemoryStoryStore {
    stories: Mutex<Vec<StoryRecord>>,
}

impl InMemoryStoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Mock
    }

    async fn insert(&self, table: &str, story: &NewStory) -> Result<StoryRecord, StoreError> {
        tokio::task::yield_now().await;
        if table != STORIES_TABLE {
            return Err(StoreError::TableNotSupported(table.to_string()));
        }

        let record = StoryRecord {
            id: format!("mock-{}", Uuid::new_v4()),
            created_at: Utc::now(),
            story: story.clone(),
        };
        let mut stories = self.stories.lock().await;
        stories.push(record.clone());
        debug!(id = %record.id, total = stories.len(), "Story stored in memory");
        Ok(record)
    }

    async fn select(&self, table: &str, order: &Order) -> Result<Vec<StoryRecord>, StoreError> {
        tokio::task::yield_now().await;
        if table != STORIES_TABLE {
            return Ok(Vec::new());
        }

        let mut rows = self.stories.lock().await.clone();
        // Stable sort; ties keep insertion order in both directions.
        rows.sort_by(|a, b| {
            if order.ascending {
                compare_column(a, b, &order.column)
            } else {
                compare_column(b, a, &order.column)
            }
        });
        Ok(rows)
    }
}

// Unknown columns compare equal, leaving insertion order untouched.
fn compare_column(a: &StoryRecord, b: &StoryRecord, column: &str) -> Ordering {
    match column {
        "id" => a.id.cmp(&b.id),
        "created_at" => a.created_at.cmp(&b.created_at),
        "title" => a.story.title.cmp(&b.story.title),
        "subject" => a.story.subject.cmp(&b.story.subject),
        "academic_grade" => a.story.academic_grade.cmp(&b.story.academic_grade),
        "word_count" => a.story.word_count.cmp(&b.story.word_count),
        _ => Ordering::Equal,
    }
}
