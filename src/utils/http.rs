//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;
use url::Url;

use crate::config::ClientConfig;
use crate::sources::SourceError;

/// Default user agent: crate name and version
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client bound to a base URL
///
/// Idle connections are not pooled: every call opens its own connection and
/// releases it when the call completes, successfully or not.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    base_url: Url,
}

impl HttpClient {
    /// Create a client with default settings against the public endpoint
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&ClientConfig::default())
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, SourceError> {
        config.validate()?;

        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| SourceError::Config(format!("Invalid base URL: {}", e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(config.request_timeout())
            .connect_timeout(config.connection_timeout())
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path relative to the base URL
    pub fn url(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SourceError::Config(format!("Invalid request path {:?}: {}", path, e)))
    }
}
