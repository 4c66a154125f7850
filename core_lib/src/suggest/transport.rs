use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::payload::SuggestionPayload;
use crate::config::FormConfig;
use crate::error::{AppError, Result};

#[async_trait]
pub trait SuggestionTransport: Send + Sync {
    /// Posts the payload as JSON. Any non-2xx status is an error.
    async fn post_json(&self, url: &str, payload: &SuggestionPayload) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &FormConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if config.request_timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_seconds));
        }
        Ok(Self::with_client(builder.build()?))
    }
}

#[async_trait]
impl SuggestionTransport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &SuggestionPayload) -> Result<()> {
        // `json` sets `Content-Type: application/json`.
        let response = self.client.post(url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UnexpectedStatus(status.as_u16()));
        }

        debug!(status = status.as_u16(), "Suggestion accepted by endpoint");
        Ok(())
    }
}
