//! Story Storage
//!
//! The storage contract the application codes against, with a hosted-database
//! adapter and an in-memory stand-in used when no usable credentials exist.

pub mod memory;
pub mod supabase;

use crate::models::{NewStory, StoryRecord};
use async_trait::async_trait;
use std::fmt;

pub use memory::InMemoryStoryStore;
pub use supabase::SupabaseStore;

/// The table generated stories are kept in.
pub const STORIES_TABLE: &str = "stories";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Table {0} not supported in mock")]
    TableNotSupported(String),
    #[error("Could not construct database client: {0}")]
    Construction(String),
    #[error("Invalid table name '{0}'")]
    InvalidTable(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Database API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Unexpected database response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Insert into {0} returned no rows")]
    NoRowReturned(String),
    #[error("Story storage is disabled")]
    StorageDisabled,
}

/// Which implementation sits behind a store handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Supabase,
    Mock,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Supabase => write!(f, "supabase"),
            StoreKind::Mock => write!(f, "mock"),
        }
    }
}

/// Sort order for [`StoryStore::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }

    /// Most recently created first.
    pub fn newest_first() -> Self {
        Self::descending("created_at")
    }
}

/// Table-scoped access to stored stories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    /// Inserts `story` into `table` and returns the stored row.
    async fn insert(&self, table: &str, story: &NewStory) -> Result<StoryRecord, StoreError>;

    /// Returns every row of `table` sorted by `order`.
    async fn select(&self, table: &str, order: &Order) -> Result<Vec<StoryRecord>, StoreError>;
}
