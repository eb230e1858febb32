//! Application state and service initialization
//!
//! Centralizes service construction and dependency injection so the wiring
//! is in one place and testable pieces stay constructor-injected.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::db::repository::AnalysisRepository;
use crate::model::Config;
use crate::service::gemini::transport::{HttpTransport, TokioClock};
use crate::service::{AdmissionController, AnalysisService, GeminiClient};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Database connection pool
    pub db_pool: PgPool,
    /// Analysis orchestration service
    pub analysis_service: Arc<AnalysisService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. Gemini client construction (requires GOOGLE_API_KEY)
    /// 3. Service dependency graph construction
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        let api_key = config
            .google_api_key
            .as_deref()
            .ok_or(AppError::MissingConfig("GOOGLE_API_KEY"))?;

        tracing::info!(
            model = %config.gemini_model,
            timeout_secs = config.analysis_timeout_secs,
            rate_limit = config.enable_rate_limit,
            "Analysis pipeline initialized"
        );

        let transport = HttpTransport::new(
            api_key,
            &config.gemini_model,
            Duration::from_secs(config.analysis_timeout_secs),
        );
        let client = GeminiClient::new(Arc::new(transport), Arc::new(TokioClock));

        let admission = AdmissionController::new(config.enable_rate_limit);
        let repository = Arc::new(AnalysisRepository::new(db_pool.clone()));

        let analysis_service = Arc::new(AnalysisService::new(admission, client, repository));

        Ok(Self {
            db_pool,
            analysis_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),
}
