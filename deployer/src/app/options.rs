//! Application configuration options

use std::time::Duration;

use secrecy::SecretString;

use crate::deploy::poller;
use crate::settings::Settings;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend API base URL
    pub backend_base_url: String,

    /// API token for authenticated calls
    pub api_token: Option<SecretString>,

    /// Status poller options
    pub poller: poller::Options,

    /// Page size for deployment listings
    pub list_page_size: usize,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8000/api/v1".to_string(),
            api_token: None,
            poller: poller::Options::default(),
            list_page_size: 20,
        }
    }
}

impl AppOptions {
    /// Derive application options from the settings file
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            backend_base_url: settings.backend.base_url.clone(),
            api_token: settings
                .backend
                .api_token
                .clone()
                .map(SecretString::from),
            poller: poller::Options {
                interval: Duration::from_secs(settings.polling.interval_secs),
                max_consecutive_failures: settings.polling.max_consecutive_failures,
                ..Default::default()
            },
            list_page_size: settings.list_page_size,
        }
    }
}
