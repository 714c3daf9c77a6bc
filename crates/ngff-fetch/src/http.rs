//! reqwest-backed [`JsonFetcher`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::JsonFetcher;

/// Fetches JSON documents over HTTP(S).
///
/// Status mapping: 404 is [`FetchError::NotFound`], any other non-2xx is
/// [`FetchError::Status`], transport failures (including timeouts while
/// reading the body) are [`FetchError::Network`]. Nothing is retried.
/// URLs that do not parse are rejected with [`FetchError::Client`] before
/// any request is made.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher from configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { http })
    }

    /// Wrap an existing client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let target = url::Url::parse(url)
            .map_err(|e| FetchError::Client(format!("invalid URL '{url}': {e}")))?;
        tracing::debug!(url, "GET");

        let resp = self
            .http
            .get(target)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&body).map_err(|e| FetchError::InvalidJson {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
