//! Command implementations for the `easystory` binary.

use crate::config::Config;
use anyhow::{Context, Result};
use easystory_core::models::StoryRecord;
use easystory_core::{
    ClientBootstrapper, ConfigLoader, StoryApiClient, StoryGenerator, StoryService,
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{info, warn};

/// The wired-up client layer, created once at startup.
#[derive(Clone)]
pub struct App {
    pub loader: Arc<ConfigLoader>,
    pub bootstrapper: Arc<ClientBootstrapper>,
    pub stories: StoryService,
    pub generator: Arc<dyn StoryGenerator>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let defaults = config.runtime_defaults();
        let generator = Arc::new(StoryApiClient::new(&defaults, config.origin.clone()));
        let loader = Arc::new(ConfigLoader::new(config.origin.clone(), defaults));
        Self::from_parts(loader, generator)
    }

    pub fn from_parts(loader: Arc<ConfigLoader>, generator: Arc<dyn StoryGenerator>) -> Self {
        let bootstrapper = Arc::new(ClientBootstrapper::new(loader.clone()));
        let stories = StoryService::new(bootstrapper.clone());
        Self {
            loader,
            bootstrapper,
            stories,
            generator,
        }
    }
}

/// Result of the `generate` command.
#[derive(Debug)]
pub struct GenerateOutcome {
    pub story: Value,
    pub saved: Option<StoryRecord>,
}

/// Parses a `key=value` pair given with `--field`.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

/// Builds the form payload sent to the story API.
pub fn build_form_data(subject: &str, academic_grade: &str, fields: &[(String, String)]) -> Value {
    let mut form = Map::new();
    form.insert("subject".to_string(), Value::String(subject.to_string()));
    form.insert(
        "academic_grade".to_string(),
        Value::String(academic_grade.to_string()),
    );
    for (key, value) in fields {
        form.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(form)
}

/// Generates a story and optionally stores it.
///
/// A failed save is logged and reported as `saved: None`; it never fails the
/// generation itself.
pub async fn generate(app: &App, form_data: &Value, save: bool) -> Result<GenerateOutcome> {
    let story = app
        .generator
        .generate_story(form_data)
        .await
        .context("Story generation failed")?;

    let saved = if save {
        match app.stories.save_story(&story).await {
            Ok(record) => {
                info!(id = %record.id, "Story stored");
                Some(record)
            }
            Err(e) => {
                warn!(error = %e, "Story generated but not stored");
                None
            }
        }
    } else {
        None
    };

    Ok(GenerateOutcome { story, saved })
}

/// All stored stories, newest first, as a JSON array.
pub async fn list(app: &App) -> Result<Value> {
    let stories = app
        .stories
        .get_stories()
        .await
        .context("Failed to list stories")?;
    Ok(serde_json::to_value(stories)?)
}

/// The loaded runtime configuration and the selected store, key redacted.
pub async fn describe_config(app: &App) -> Value {
    let config = app.loader.ready().await;
    let store = app.bootstrapper.get_client().await;
    json!({
        "origin": app.loader.origin(),
        "api_url": config.story_api_base(),
        "database_url": config.database_url,
        "database_key": config.redacted_key(),
        "debug": config.debug,
        "enable_storage": config.enable_storage,
        "store": store.kind().to_string(),
    })
}
