//! Settings file management

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DeployerError;
use crate::logs::LogLevel;

/// Deployer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Status polling configuration
    #[serde(default)]
    pub polling: PollingSettings,

    /// Page size for deployment listings
    #[serde(default = "default_page_size")]
    pub list_page_size: usize,
}

fn default_page_size() -> usize {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            backend: BackendSettings::default(),
            polling: PollingSettings::default(),
            list_page_size: default_page_size(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, DeployerError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let settings = serde_json::from_str(&raw)?;
        Ok(settings)
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the deployments API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// API token for authenticated calls
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_backend_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            api_token: None,
        }
    }
}

/// Status polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Polling interval in seconds
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// Stop after this many consecutive failed polls; absent means poll
    /// indefinitely
    #[serde(default)]
    pub max_consecutive_failures: Option<u32>,
}

fn default_poll_interval() -> u64 {
    4
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            max_consecutive_failures: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.polling.interval_secs, 4);
        assert!(settings.polling.max_consecutive_failures.is_none());
        assert_eq!(settings.list_page_size, 20);
        assert_eq!(settings.log_level, LogLevel::Info);
    }

    #[test]
    fn test_partial_override() {
        let raw = r#"{
            "log_level": "debug",
            "backend": {"base_url": "https://api.netpad.io/v1"},
            "polling": {"interval_secs": 3, "max_consecutive_failures": 10}
        }"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.backend.base_url, "https://api.netpad.io/v1");
        assert_eq!(settings.polling.interval_secs, 3);
        assert_eq!(settings.polling.max_consecutive_failures, Some(10));
    }
}
