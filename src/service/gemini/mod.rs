//! Gemini-backed analysis client
//!
//! Builds the analysis prompt, calls the upstream model, retries on
//! throttling, and validates the returned payload into an AnalysisReport.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::model::AnalysisReport;

pub mod prompts;
pub mod transport;
pub mod validation;

mod error;

pub use error::GeminiError;

use transport::{Clock, ModelTransport};

/// Retries applied on top of the first attempt, 429 responses only
const MAX_RETRIES: u32 = 3;

/// Base backoff delay; the wait doubles on each retry (2s, 4s, 8s)
const BASE_DELAY_SECS: u64 = 2;

/// Client for the upstream generative model
pub struct GeminiClient {
    transport: Arc<dyn ModelTransport>,
    clock: Arc<dyn Clock>,
}

impl GeminiClient {
    pub fn new(transport: Arc<dyn ModelTransport>, clock: Arc<dyn Clock>) -> Self {
        Self { transport, clock }
    }

    /// Evaluate a piece of text through the upstream model
    ///
    /// Only HTTP 429 is retried; every other failure is terminal on first
    /// occurrence. A malformed payload is a content fault, not a transport
    /// fault, so it is never retried either.
    pub async fn evaluate(&self, text: &str) -> Result<AnalysisReport, GeminiError> {
        let prompt = prompts::build_analysis_prompt(text);
        let start = std::time::Instant::now();

        let mut attempt: u32 = 0;
        loop {
            let response = self.transport.send(&prompt).await?;

            if response.status == 429 {
                if attempt < MAX_RETRIES {
                    let delay = Duration::from_secs(BASE_DELAY_SECS << attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_secs = delay.as_secs(),
                        "Gemini rate limit hit, backing off"
                    );
                    self.clock.sleep(delay).await;
                    attempt += 1;
                    continue;
                }

                tracing::error!(attempts = attempt + 1, "Gemini rate limit retries exhausted");
                return Err(GeminiError::UpstreamRateLimited {
                    attempts: attempt + 1,
                });
            }

            if !(200..300).contains(&response.status) {
                tracing::error!(status = response.status, "Gemini API call failed");
                return Err(GeminiError::UpstreamUnavailable {
                    status: response.status,
                });
            }

            tracing::info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                attempts = attempt + 1,
                "Gemini API call completed"
            );

            let payload = extract_payload(&response.body)?;
            return validation::validate_report(&payload).map_err(|e| {
                tracing::error!(error = %e, "Gemini returned an invalid payload");
                GeminiError::MalformedResponse(e.to_string())
            });
        }
    }
}

/// Pull the model's text out of the generateContent response envelope
fn extract_payload(body: &str) -> Result<String, GeminiError> {
    let envelope: Value = serde_json::from_str(body).map_err(|e| {
        GeminiError::MalformedResponse(format!("response envelope is not valid JSON: {e}"))
    })?;

    let text = envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GeminiError::MalformedResponse("response envelope has no candidate text".to_string())
        })?;

    Ok(strip_code_fences(text))
}

/// Strip markdown code fences the model sometimes wraps its JSON in
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::transport::doubles::{RecordingClock, Reply, ScriptedTransport};
    use super::*;
    use crate::model::RiskLevel;

    fn report_json() -> String {
        serde_json::json!({
            "summary_score": 80,
            "overall_risk_level": "High",
            "claims": [{
                "claim": "The earth is flat.",
                "verdict": "False",
                "fact_check_probability": 95,
                "confidence": 90,
                "reasoning": "Contradicted by centuries of observation."
            }],
            "emotional_tone": "Neutral",
            "manipulation_score": 70,
            "confidence_overall": 85
        })
        .to_string()
    }

    fn envelope(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": text }]
                }
            }]
        })
        .to_string()
    }

    fn client(replies: Vec<Reply>) -> (GeminiClient, Arc<ScriptedTransport>, Arc<RecordingClock>) {
        let transport = Arc::new(ScriptedTransport::new(replies));
        let clock = Arc::new(RecordingClock::default());
        let client = GeminiClient::new(transport.clone(), clock.clone());
        (client, transport, clock)
    }

    #[tokio::test]
    async fn succeeds_on_clean_response() {
        let (client, transport, clock) =
            client(vec![Reply::Status(200, envelope(&report_json()))]);

        let report = client.evaluate("The earth is flat.").await.unwrap();

        assert_eq!(report.overall_risk_level, RiskLevel::High);
        assert_eq!(report.claims.len(), 1);
        assert_eq!(transport.calls(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn strips_markdown_fences_before_parsing() {
        let fenced = format!("```json\n{}\n```", report_json());
        let (client, _, _) = client(vec![Reply::Status(200, envelope(&fenced))]);

        assert!(client.evaluate("some text").await.is_ok());
    }

    #[tokio::test]
    async fn retries_twice_then_succeeds_with_doubling_backoff() {
        let (client, transport, clock) = client(vec![
            Reply::Status(429, String::new()),
            Reply::Status(429, String::new()),
            Reply::Status(200, envelope(&report_json())),
        ]);

        let report = client.evaluate("some text").await.unwrap();

        assert_eq!(report.summary_score, 80);
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn exhausts_retries_after_four_throttled_attempts() {
        let (client, transport, clock) = client(vec![
            Reply::Status(429, String::new()),
            Reply::Status(429, String::new()),
            Reply::Status(429, String::new()),
            Reply::Status(429, String::new()),
        ]);

        let err = client.evaluate("some text").await.unwrap_err();

        assert!(matches!(
            err,
            GeminiError::UpstreamRateLimited { attempts: 4 }
        ));
        // No fifth attempt: the scripted transport would panic on one.
        assert_eq!(transport.calls(), 4);
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
    }

    #[tokio::test]
    async fn non_throttle_http_failure_is_terminal() {
        let (client, transport, clock) =
            client(vec![Reply::Status(500, "oops".to_string())]);

        let err = client.evaluate("some text").await.unwrap_err();

        assert!(matches!(err, GeminiError::UpstreamUnavailable { status: 500 }));
        assert_eq!(transport.calls(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn connection_failure_is_terminal() {
        let (client, transport, _) = client(vec![Reply::ConnectionError(
            "dns lookup failed".to_string(),
        )]);

        let err = client.evaluate("some text").await.unwrap_err();

        assert!(matches!(err, GeminiError::UpstreamConnectivity(_)));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_payload_is_never_retried() {
        let (client, transport, clock) = client(vec![Reply::Status(
            200,
            envelope("this is prose, not JSON"),
        )]);

        let err = client.evaluate("some text").await.unwrap_err();

        assert!(matches!(err, GeminiError::MalformedResponse(_)));
        assert_eq!(transport.calls(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn envelope_without_candidate_text_is_malformed() {
        let (client, _, _) = client(vec![Reply::Status(200, "{}".to_string())]);

        let err = client.evaluate("some text").await.unwrap_err();

        assert!(matches!(err, GeminiError::MalformedResponse(_)));
    }

    #[test]
    fn fence_stripping_leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    /// Live end-to-end check against the real Gemini API.
    /// Needs GOOGLE_API_KEY; run with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn live_flat_earth_analysis() {
        let api_key = std::env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY must be set");
        let transport = Arc::new(transport::HttpTransport::new(
            &api_key,
            "gemini-flash-latest",
            Duration::from_secs(30),
        ));
        let client = GeminiClient::new(transport, Arc::new(transport::TokioClock));

        let report = client.evaluate("The earth is flat.").await.unwrap();

        assert!(!report.claims.is_empty());
        assert_eq!(
            report.overall_risk_level,
            RiskLevel::from_score(report.summary_score)
        );
    }
}
