//! Story API Client
//!
//! A single-attempt client for the story generation endpoint. Every failure is
//! returned to the caller, which decides how to recover.

use crate::runtime_config::RuntimeConfig;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use serde_json::Value;
use tracing::{debug, error, info};

/// Path of the story generation endpoint, relative to the API base URL.
pub const STORIES_PATH: &str = "/stories";

const STATUS_EXCERPT_CHARS: usize = 50;
const RAW_BODY_PREVIEW_CHARS: usize = 200;
const UNREADABLE_BODY: &str = "Could not read error response";

#[derive(Debug, thiserror::Error)]
pub enum StoryApiError {
    /// The request never completed. The transport error is passed through as is.
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error("API request failed: {status} - {excerpt}")]
    Status { status: u16, excerpt: String },
    #[error("Failed to parse response: {message}")]
    Parse { message: String, raw_body: String },
}

/// Anything that can turn a submitted form into a story.
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    async fn generate_story(&self, form_data: &Value) -> Result<Value, StoryApiError>;
}

/// HTTP implementation of [`StoryGenerator`] against `<base_url>/stories`.
#[derive(Clone, Debug)]
pub struct StoryApiClient {
    http: reqwest::Client,
    base_url: String,
    origin: String,
}

impl StoryApiClient {
    /// Creates a client for the API configured in `config`, sending `origin`
    /// as the caller's origin.
    pub fn new(config: &RuntimeConfig, origin: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), config.story_api_base(), origin)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            origin: origin.into(),
        }
    }

    /// Full URL of the story endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), STORIES_PATH)
    }
}

#[async_trait]
impl StoryGenerator for StoryApiClient {
    async fn generate_story(&self, form_data: &Value) -> Result<Value, StoryApiError> {
        let url = self.endpoint();
        info!(url = %url, "Generating story");
        debug!(body = %excerpt(&form_data.to_string(), RAW_BODY_PREVIEW_CHARS), "POST request body");

        let mut request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(form_data);
        if !self.origin.is_empty() {
            request = request.header(ORIGIN, self.origin.as_str());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, url = %url, "Story request did not complete");
                return Err(e.into());
            }
        };

        let status = response.status();
        info!(status = status.as_u16(), "POST response received");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_BODY.to_string());
            error!(
                status = status.as_u16(),
                body = %excerpt(&body, RAW_BODY_PREVIEW_CHARS),
                "Story request failed"
            );
            return Err(StoryApiError::Status {
                status: status.as_u16(),
                excerpt: excerpt(&body, STATUS_EXCERPT_CHARS),
            });
        }

        let body = response.text().await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(story) => {
                info!("Story generated successfully");
                Ok(story)
            }
            Err(e) => {
                let raw_body = excerpt(&body, RAW_BODY_PREVIEW_CHARS);
                error!(error = %e, raw = %raw_body, "Error parsing story response");
                Err(StoryApiError::Parse {
                    message: e.to_string(),
                    raw_body,
                })
            }
        }
    }
}

/// The first `max` characters of `text`.
pub(crate) fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
