use easystory_core::RuntimeConfig;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Origin serving `/config/client-env`, also sent as the `Origin` header.
    pub origin: String,
    pub api_url: String,
    pub debug: bool,
    pub enable_storage: bool,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let origin = std::env::var("EASYSTORY_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        if origin.is_empty() {
            return Err(ConfigError::MissingVar("EASYSTORY_ORIGIN".to_string()));
        }

        let api_url = std::env::var("EASYSTORY_API_URL").unwrap_or_default();
        let debug = bool_var("EASYSTORY_DEBUG", true)?;
        let enable_storage = bool_var("EASYSTORY_ENABLE_STORAGE", true)?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            origin,
            api_url,
            debug,
            enable_storage,
            log_level,
        })
    }

    /// The compiled-in runtime defaults, adjusted by this configuration.
    pub fn runtime_defaults(&self) -> RuntimeConfig {
        RuntimeConfig {
            api_url: self.api_url.clone(),
            debug: self.debug,
            enable_storage: self.enable_storage,
            ..RuntimeConfig::default()
        }
    }
}

fn bool_var(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.trim().to_lowercase().parse::<bool>().map_err(|_| {
            ConfigError::InvalidValue(name.to_string(), format!("'{}' is not a boolean", value))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("EASYSTORY_ORIGIN");
            env::remove_var("EASYSTORY_API_URL");
            env::remove_var("EASYSTORY_DEBUG");
            env::remove_var("EASYSTORY_ENABLE_STORAGE");
            env::remove_var("RUST_LOG");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.origin, "http://localhost:8000");
        assert_eq!(config.api_url, "");
        assert!(config.debug);
        assert!(config.enable_storage);
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("EASYSTORY_ORIGIN", "https://easystory.example.org");
            env::set_var("EASYSTORY_API_URL", "http://127.0.0.1:9000");
            env::set_var("EASYSTORY_DEBUG", "false");
            env::set_var("EASYSTORY_ENABLE_STORAGE", "FALSE");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.origin, "https://easystory.example.org");
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert!(!config.debug);
        assert!(!config.enable_storage);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_config_invalid_bool() {
        clear_env_vars();
        unsafe {
            env::set_var("EASYSTORY_DEBUG", "maybe");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "EASYSTORY_DEBUG"),
            _ => panic!("Expected InvalidValue for EASYSTORY_DEBUG"),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "RUST_LOG"),
            _ => panic!("Expected InvalidValue for RUST_LOG"),
        }
    }

    #[test]
    #[serial]
    fn test_config_empty_origin() {
        clear_env_vars();
        unsafe {
            env::set_var("EASYSTORY_ORIGIN", "");
        }

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(ref v) if v == "EASYSTORY_ORIGIN"));
    }

    #[test]
    fn test_runtime_defaults() {
        let config = Config {
            origin: "http://localhost:8000".to_string(),
            api_url: "http://127.0.0.1:9000".to_string(),
            debug: false,
            enable_storage: false,
            log_level: Level::INFO,
        };

        let runtime = config.runtime_defaults();
        assert_eq!(runtime.api_url, "http://127.0.0.1:9000");
        assert_eq!(runtime.database_url, "");
        assert!(!runtime.debug);
        assert!(!runtime.enable_storage);
    }
}
