//! REST API endpoint for text analysis

use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::ApiError;
use crate::auth;
use crate::model::Config;
use crate::service::AnalysisService;

/// Request body for analysis
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Free-form text to analyze, 1-5000 characters after trimming
    pub text: String,
}

/// Analyze a piece of text for misinformation risk
///
/// Anonymous callers are admitted through a per-address rate limit;
/// authenticated callers get the result persisted to their history.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Validated analysis result", body = crate::model::AnalysisReport),
        (status = 400, description = "Invalid input", body = super::error::ErrorResponse),
        (status = 429, description = "Rate limited, locally or upstream", body = super::error::ErrorResponse),
        (status = 502, description = "Upstream returned a malformed response", body = super::error::ErrorResponse),
        (status = 503, description = "Upstream unavailable or unreachable", body = super::error::ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/analyze")]
pub async fn analyze(
    req: HttpRequest,
    body: web::Json<AnalyzeRequest>,
    service: web::Data<AnalysisService>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let identity = auth::resolve_identity(&req, &config.auth_secret);

    let report = service.analyze(&body.text, &identity).await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze);
}
