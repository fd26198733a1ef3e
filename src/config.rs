//! Configuration management for Folio.
//!
//! Handles loading, saving, and validating configuration from
//! platform-specific config directories.

use crate::error::ConfigError;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name used for config directory.
const APP_NAME: &str = "Folio";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Placeholder value for unconfigured API keys.
const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API configuration.
    pub api: ApiConfig,

    /// Translation behavior settings.
    pub translation: TranslationConfig,
}

/// API configuration for the Gemini endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key. Prompted for interactively when left as the placeholder.
    pub key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Per-request timeout in seconds.
    pub timeout_sec: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: API_KEY_PLACEHOLDER.to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_sec: 60,
        }
    }
}

impl ApiConfig {
    /// Checks if the API key is configured (not placeholder).
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && self.key != API_KEY_PLACEHOLDER
    }

    /// Returns a copy of this config using `key` instead.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..self.clone()
        }
    }
}

/// Translation behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Number of attempts per unit before a failure marker is used.
    pub retries: u32,

    /// Delay between failed attempts in seconds.
    pub retry_delay_sec: f64,

    /// Delay after each paragraph in seconds.
    pub delay_between_requests_sec: f64,

    /// Target language used when none is given on the command line.
    pub language: Option<String>,

    /// Tone used when none is given on the command line.
    pub tone: Option<String>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            retries: 5,
            retry_delay_sec: 2.0,
            delay_between_requests_sec: 1.5,
            language: None,
            tone: None,
        }
    }
}

impl TranslationConfig {
    /// Retry policy for a single translation unit.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_secs_f64(self.retry_delay_sec))
    }

    /// Pause imposed after every paragraph.
    pub fn throttle(&self) -> Duration {
        Duration::from_secs_f64(self.delay_between_requests_sec)
    }
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// The API key is not checked here; it is probed against the service
    /// before the translation pass starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("api.base_url".to_string()));
        }

        if self.api.model.trim().is_empty() {
            return Err(ConfigError::MissingValue("api.model".to_string()));
        }

        if self.translation.retries == 0 {
            return Err(ConfigError::InvalidValue {
                key: "translation.retries".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        let delays = [
            ("translation.retry_delay_sec", self.translation.retry_delay_sec),
            (
                "translation.delay_between_requests_sec",
                self.translation.delay_between_requests_sec,
            ),
        ];
        for (key, value) in delays {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be a non-negative number of seconds within range".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.api.is_configured());
        assert_eq!(config.api.model, "gemini-1.5-flash");
        assert_eq!(config.translation.retries, 5);
        assert_eq!(config.translation.retry_delay_sec, 2.0);
        assert_eq!(config.translation.delay_between_requests_sec, 1.5);
    }

    #[test]
    fn test_api_configured_check() {
        let mut api = ApiConfig::default();
        assert!(!api.is_configured());

        api.key = "AIza-real-key".to_string();
        assert!(api.is_configured());

        assert!(!api.with_key("").is_configured());
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.translation.language = Some("French".to_string());
        let file = NamedTempFile::new().unwrap();

        config.save_to(file.path()).unwrap();

        let loaded = Config::load_from(file.path()).unwrap();
        assert_eq!(loaded.api.model, config.api.model);
        assert_eq!(loaded.translation.retries, config.translation.retries);
        assert_eq!(loaded.translation.language.as_deref(), Some("French"));
    }

    #[test]
    fn test_missing_file_creates_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.translation.retries, 5);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[translation]\nretries = 2\n").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.translation.retries, 2);
        assert_eq!(config.translation.retry_delay_sec, 2.0);
        assert_eq!(config.api.timeout_sec, 60);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.translation.retries = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.translation.retry_delay_sec = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.model = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.translation.retry_delay_sec = 1e30;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.translation.delay_between_requests_sec = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = TranslationConfig::default();
        let policy = config.retry_policy();
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.delay, Duration::from_secs(2));
        assert_eq!(config.throttle(), Duration::from_millis(1500));
    }
}
