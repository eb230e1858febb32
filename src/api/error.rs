//! Unified API error handling
//!
//! This module provides a consistent error response format across all API
//! endpoints.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbError;
use crate::service::analysis::AnalysisError;
use crate::service::gemini::GeminiError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent
/// error handling. No error is ever downgraded to a fallback analysis.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Local input validation failed (400)
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Endpoint requires an authenticated caller (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Analysis record not found (404)
    #[error("Analysis not found: {0}")]
    NotFound(String),

    /// Local admission control rejected the caller (429)
    #[error("Too many requests. Please try again later.")]
    RateLimited,

    /// Upstream model throttled us until retries ran out (429)
    #[error("AI usage limit exceeded. Please try again later.")]
    UpstreamRateLimited,

    /// Upstream answered but the payload failed parsing or validation (502)
    #[error("AI returned a malformed response: {0}")]
    MalformedUpstreamResponse(String),

    /// Upstream answered with a non-success status (503)
    #[error("AI verification service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// No response from upstream at all (503)
    #[error("AI verification service connectivity error: {0}")]
    UpstreamConnectivity(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::RateLimited => "rate_limited",
            ApiError::UpstreamRateLimited => "upstream_rate_limited",
            ApiError::MalformedUpstreamResponse(_) => "malformed_upstream_response",
            ApiError::UpstreamUnavailable(_) => "upstream_unavailable",
            ApiError::UpstreamConnectivity(_) => "upstream_connectivity_error",
            ApiError::Database(_) => "database_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited | ApiError::UpstreamRateLimited => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::MalformedUpstreamResponse(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamUnavailable(_) | ApiError::UpstreamConnectivity(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<GeminiError> for ApiError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::UpstreamRateLimited { .. } => ApiError::UpstreamRateLimited,
            GeminiError::UpstreamUnavailable { status } => {
                ApiError::UpstreamUnavailable(format!("upstream returned HTTP {status}"))
            }
            GeminiError::UpstreamConnectivity(e) => ApiError::UpstreamConnectivity(e.to_string()),
            GeminiError::MalformedResponse(msg) => ApiError::MalformedUpstreamResponse(msg),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidInput(msg) => ApiError::InvalidInput(msg.to_string()),
            AnalysisError::RateLimited => ApiError::RateLimited,
            AnalysisError::Model(e) => e.into(),
            AnalysisError::Database(DbError::NotFound(id)) => ApiError::NotFound(id),
            AnalysisError::Database(e) => ApiError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_maps_to_stable_statuses() {
        let cases: &[(ApiError, u16)] = &[
            (ApiError::InvalidInput("bad".into()), 400),
            (ApiError::Unauthorized, 401),
            (ApiError::NotFound("7".into()), 404),
            (ApiError::RateLimited, 429),
            (ApiError::UpstreamRateLimited, 429),
            (ApiError::MalformedUpstreamResponse("junk".into()), 502),
            (ApiError::UpstreamUnavailable("HTTP 500".into()), 503),
            (ApiError::UpstreamConnectivity("refused".into()), 503),
            (ApiError::Database("down".into()), 500),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code().as_u16(), *expected, "{err}");
        }
    }

    #[test]
    fn gemini_errors_keep_their_kind() {
        let err: ApiError = GeminiError::UpstreamRateLimited { attempts: 4 }.into();
        assert_eq!(err.error_type(), "upstream_rate_limited");

        let err: ApiError = GeminiError::MalformedResponse("bad".into()).into();
        assert_eq!(err.error_type(), "malformed_upstream_response");
    }

    #[test]
    fn foreign_record_lookup_maps_to_not_found() {
        let err: ApiError = AnalysisError::Database(DbError::NotFound("9".into())).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
