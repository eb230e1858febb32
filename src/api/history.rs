//! REST API endpoints for a user's analysis history

use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::api::ApiError;
use crate::auth;
use crate::model::{Config, Identity};
use crate::service::AnalysisService;

fn require_user(req: &HttpRequest, config: &Config) -> Result<i64, ApiError> {
    match auth::resolve_identity(req, &config.auth_secret) {
        Identity::Authenticated { user_id } => Ok(user_id),
        Identity::Anonymous { .. } => Err(ApiError::Unauthorized),
    }
}

/// List the caller's stored analyses, newest first
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Stored analyses for the caller", body = Vec<crate::model::AnalysisRecord>),
        (status = 401, description = "Authentication required", body = super::error::ErrorResponse)
    ),
    tag = "history"
)]
#[get("/history")]
pub async fn get_history(
    req: HttpRequest,
    service: web::Data<AnalysisService>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user(&req, &config)?;

    let records = service.history(user_id).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Get one stored analysis by id, scoped to the caller
#[utoipa::path(
    get,
    path = "/history/{id}",
    params(
        ("id" = i64, Path, description = "Analysis record id")
    ),
    responses(
        (status = 200, description = "Stored analysis", body = crate::model::AnalysisRecord),
        (status = 401, description = "Authentication required", body = super::error::ErrorResponse),
        (status = 404, description = "No such record owned by the caller", body = super::error::ErrorResponse)
    ),
    tag = "history"
)]
#[get("/history/{id}")]
pub async fn get_history_entry(
    req: HttpRequest,
    path: web::Path<i64>,
    service: web::Data<AnalysisService>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user(&req, &config)?;
    let id = path.into_inner();

    let record = service.history_entry(id, user_id).await?;

    Ok(HttpResponse::Ok().json(record))
}

/// Configure history routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_history).service(get_history_entry);
}
