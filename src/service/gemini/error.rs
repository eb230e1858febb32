//! Error types for the Gemini analysis client

use thiserror::Error;

use super::transport::TransportError;

/// Error type for upstream model evaluation
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Upstream kept answering 429 until the retry budget ran out
    #[error("Gemini API rate limit exceeded after {attempts} attempts")]
    UpstreamRateLimited { attempts: u32 },

    /// Upstream answered with a non-success, non-429 status
    #[error("Gemini API returned HTTP {status}")]
    UpstreamUnavailable { status: u16 },

    /// No usable response from upstream at all
    #[error("Gemini API connection error: {0}")]
    UpstreamConnectivity(#[from] TransportError),

    /// Upstream answered 2xx but the payload failed extraction or validation
    #[error("Gemini returned a malformed response: {0}")]
    MalformedResponse(String),
}
