//! Transport and timing seams for the Gemini client
//!
//! The HTTP call and the backoff sleep sit behind traits so the retry loop
//! can be driven deterministically in tests.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection failed: {0}")]
    Connection(String),
}

/// Raw upstream reply, before any interpretation of the payload
#[derive(Debug)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one analysis prompt to the upstream model and returns the raw reply
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn send(&self, prompt: &str) -> Result<TransportResponse, TransportError>;
}

/// Cooperative time source for backoff waits
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by the tokio timer
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// reqwest-backed transport posting the Gemini generateContent envelope
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Each attempt is bounded by `timeout`; retries are handled by the caller.
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let url = format!("{GEMINI_API_BASE}/{model}:generateContent?key={api_key}");

        Self { client, url }
    }
}

#[async_trait]
impl ModelTransport for HttpTransport {
    async fn send(&self, prompt: &str) -> Result<TransportResponse, TransportError> {
        let payload = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}
