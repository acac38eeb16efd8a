//! Runtime Configuration
//!
//! The values the story client and the storage layer need at runtime, plus
//! the credential checks that decide whether a real database client may be
//! built from them.

use serde::Deserialize;
use std::fmt;

/// Story API host used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "https://easystory.onrender.com";

/// Placeholder database URL shipped in setup instructions.
pub const PLACEHOLDER_DATABASE_URL: &str = "https://YOUR_SUPABASE_URL.supabase.co";
/// Placeholder database key shipped in setup instructions.
pub const PLACEHOLDER_DATABASE_KEY: &str = "YOUR_SUPABASE_KEY";
/// Example project URL from the hosted database's documentation.
pub const EXAMPLE_DATABASE_URL: &str = "https://example.supabase.co";

/// Configuration produced once at startup and shared read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Base URL of the story API. Empty means [`DEFAULT_API_URL`].
    pub api_url: String,
    pub database_url: String,
    pub database_key: String,
    pub debug: bool,
    pub enable_storage: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            database_url: String::new(),
            database_key: String::new(),
            debug: true,
            enable_storage: true,
        }
    }
}

// The key must never reach the logs in clear.
impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("api_url", &self.api_url)
            .field("database_url", &self.database_url)
            .field("database_key", &redact_key(&self.database_key))
            .field("debug", &self.debug)
            .field("enable_storage", &self.enable_storage)
            .finish()
    }
}

/// Body of the `/config/client-env` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ClientEnv {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_key: Option<String>,
}

/// Why a pair of credentials was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("database URL or key is empty")]
    Missing,
    #[error("database credentials are still the setup placeholders")]
    Placeholder,
    #[error("database credentials look like documentation examples")]
    Example,
}

/// A database URL and key that passed validation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    url: String,
    key: String,
}

impl Credentials {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("key", &redact_key(&self.key))
            .finish()
    }
}

impl RuntimeConfig {
    /// The base URL requests to the story API are built on.
    pub fn story_api_base(&self) -> &str {
        if self.api_url.is_empty() {
            DEFAULT_API_URL
        } else {
            &self.api_url
        }
    }

    /// Overwrites each credential the server actually provided.
    ///
    /// Returns the number of credentials that were taken from `env`.
    pub fn apply_client_env(&mut self, env: ClientEnv) -> usize {
        let mut loaded = 0;
        match env.supabase_url.filter(|url| !url.is_empty()) {
            Some(url) => {
                self.database_url = url;
                loaded += 1;
            }
            None => tracing::warn!("Server did not provide a database URL"),
        }
        match env.supabase_key.filter(|key| !key.is_empty()) {
            Some(key) => {
                self.database_key = key;
                loaded += 1;
            }
            None => tracing::warn!("Server did not provide a database key"),
        }
        loaded
    }

    /// In debug mode, swaps in the placeholder pair when no credential is set
    /// so the storage layer comes up in mock mode. Returns whether it did.
    pub fn apply_debug_placeholders(&mut self) -> bool {
        if !self.debug || !self.database_url.is_empty() || !self.database_key.is_empty() {
            return false;
        }
        self.database_url = PLACEHOLDER_DATABASE_URL.to_string();
        self.database_key = PLACEHOLDER_DATABASE_KEY.to_string();
        true
    }

    /// Validates the database credentials.
    ///
    /// Any key containing `example` is refused, whatever its context.
    pub fn credentials(&self) -> Result<Credentials, CredentialError> {
        let (url, key) = (self.database_url.as_str(), self.database_key.as_str());
        if url.is_empty() || key.is_empty() {
            return Err(CredentialError::Missing);
        }
        if url == PLACEHOLDER_DATABASE_URL || key == PLACEHOLDER_DATABASE_KEY {
            return Err(CredentialError::Placeholder);
        }
        if url == EXAMPLE_DATABASE_URL || key.contains("example") {
            return Err(CredentialError::Example);
        }
        Ok(Credentials {
            url: url.to_string(),
            key: key.to_string(),
        })
    }

    pub fn redacted_key(&self) -> String {
        redact_key(&self.database_key)
    }
}

/// Renders a secret as its first five characters and its length.
pub fn redact_key(key: &str) -> String {
    if key.is_empty() {
        return "(empty)".to_string();
    }
    let prefix: String = key.chars().take(5).collect();
    format!("{}...{}", prefix, key.chars().count())
}
