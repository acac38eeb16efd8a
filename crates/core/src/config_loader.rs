//! Configuration Loader
//!
//! Fetches the database credentials from the same-origin config endpoint and
//! folds them into the compiled-in defaults. Loading never fails: every error
//! is logged and the defaults stay in place.

use crate::runtime_config::{ClientEnv, RuntimeConfig};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Path of the endpoint that serves client-side configuration.
pub const CLIENT_ENV_PATH: &str = "/config/client-env";

/// Errors from a single fetch of the config endpoint. Never surfaced past the
/// loader.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFetchError {
    #[error("config endpoint unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Failed to fetch config: {status}")]
    Status { status: u16 },
    #[error("invalid config payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Loads the [`RuntimeConfig`] once and hands it to everyone who awaits it.
pub struct ConfigLoader {
    // `None` for preloaded loaders, which have no endpoint to ask.
    http: Option<reqwest::Client>,
    origin: String,
    defaults: Arc<RuntimeConfig>,
    loaded: OnceCell<Arc<RuntimeConfig>>,
}

impl ConfigLoader {
    /// Creates a loader that fetches from `<origin>/config/client-env`.
    pub fn new(origin: impl Into<String>, defaults: RuntimeConfig) -> Self {
        Self::with_client(reqwest::Client::new(), origin, defaults)
    }

    pub fn with_client(
        http: reqwest::Client,
        origin: impl Into<String>,
        defaults: RuntimeConfig,
    ) -> Self {
        Self {
            http: Some(http),
            origin: origin.into(),
            defaults: Arc::new(defaults),
            loaded: OnceCell::new(),
        }
    }

    /// A loader that is already complete with `config`; nothing is fetched.
    pub fn preloaded(config: RuntimeConfig) -> Self {
        let config = Arc::new(config);
        Self {
            http: None,
            origin: String::new(),
            defaults: config.clone(),
            loaded: OnceCell::new_with(Some(config)),
        }
    }

    /// The origin the config endpoint is resolved against.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Whether loading has completed.
    pub fn is_ready(&self) -> bool {
        self.loaded.initialized()
    }

    /// Resolves once loading has completed, running it on first call.
    ///
    /// Concurrent callers share a single fetch and all observe the same value.
    pub async fn ready(&self) -> Arc<RuntimeConfig> {
        self.loaded
            .get_or_init(|| async { Arc::new(self.load_config().await) })
            .await
            .clone()
    }

    /// Performs one load attempt: defaults, then the server's credentials.
    pub async fn load_config(&self) -> RuntimeConfig {
        let mut config = (*self.defaults).clone();
        debug!("Runtime defaults seeded");

        let Some(http) = &self.http else {
            debug!("No config endpoint; keeping defaults");
            return config;
        };

        match self.fetch_client_env(http).await {
            Ok(env) => {
                let loaded = config.apply_client_env(env);
                info!(
                    loaded,
                    database_url = %display_or_empty(&config.database_url),
                    database_key = %config.redacted_key(),
                    "Environment updated from server"
                );
            }
            Err(e) => {
                warn!(error = %e, "Failed to load config from server. Using defaults; some features may not work.");
            }
        }

        if config.apply_debug_placeholders() {
            warn!("No database credentials available. Debug mode: using placeholder credentials.");
        }

        info!("Environment loading complete");
        config
    }

    async fn fetch_client_env(
        &self,
        http: &reqwest::Client,
    ) -> Result<ClientEnv, ConfigFetchError> {
        let url = self.config_url();
        let cache_buster = chrono::Utc::now().timestamp_millis();
        info!(url = %url, "Fetching database credentials from server");

        let response = http
            .get(&url)
            .query(&[("_", cache_buster)])
            .header(CACHE_CONTROL, "no-cache")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Config response received");
        if !status.is_success() {
            return Err(ConfigFetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn config_url(&self) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), CLIENT_ENV_PATH)
    }
}

fn display_or_empty(value: &str) -> &str {
    if value.is_empty() { "(empty)" } else { value }
}
