//! HTTP client implementation

use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::DeployerError;

/// Error body shape used by every non-2xx backend response
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for backend communication
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_token: Option<SecretString>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str) -> Result<Self, DeployerError> {
        Url::parse(base_url)
            .map_err(|e| DeployerError::ConfigError(format!("invalid base URL '{base_url}': {e}")))?;

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
        })
    }

    /// Create a new HTTP client with an API token for authentication
    pub fn with_token(base_url: &str, api_token: SecretString) -> Result<Self, DeployerError> {
        let mut client = Self::new(base_url)?;
        client.api_token = Some(api_token);
        Ok(client)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let request = self.authorize(self.client.get(&url));
        let response = request.send().await?;
        Self::parse(response).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let request = self.authorize(self.client.post(&url)).json(body);
        let response = request.send().await?;
        Self::parse(response).await
    }

    /// Make a POST request without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let request = self.authorize(self.client.post(&url));
        let response = request.send().await?;
        Self::parse(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("DELETE {}", url);

        let request = self.authorize(self.client.delete(&url));
        let response = request.send().await?;
        Self::parse(response).await
    }

    /// Decode a response, mapping non-2xx statuses onto the error taxonomy.
    ///
    /// The backend always answers errors with `{"error": "..."}`; that string
    /// is surfaced verbatim to the caller.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, DeployerError> {
        let status = response.status();
        if status.is_success() {
            let body = response.json().await?;
            return Ok(body);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("{}: {}", status, raw));
        error!("HTTP request failed: {} - {}", status, message);

        Err(match status {
            StatusCode::BAD_REQUEST => DeployerError::ValidationError(message),
            StatusCode::NOT_FOUND => DeployerError::NotFound(message),
            StatusCode::CONFLICT => DeployerError::ConflictError(message),
            _ => DeployerError::UpstreamError(message),
        })
    }
}
