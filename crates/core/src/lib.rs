//! EasyStory Core
//!
//! The client layer of the story generator: runtime configuration loading,
//! the story API client, and story storage with its lazy bootstrapper.

pub mod bootstrap;
pub mod config_loader;
pub mod models;
pub mod runtime_config;
pub mod service;
pub mod store;
pub mod story_client;

pub use bootstrap::ClientBootstrapper;
pub use config_loader::ConfigLoader;
pub use runtime_config::RuntimeConfig;
pub use service::StoryService;
pub use story_client::{StoryApiClient, StoryApiError, StoryGenerator};
