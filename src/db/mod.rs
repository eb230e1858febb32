//! Database module for PostgreSQL persistence

pub mod models;
pub mod repository;

use std::env;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::model::{AnalysisRecord, AnalysisReport};

// Environment variable names
const ENV_POSTGRES_HOST: &str = "CLAIMCHECK_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "CLAIMCHECK_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "CLAIMCHECK_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "CLAIMCHECK_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "CLAIMCHECK_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "claimcheck";
const DEFAULT_POSTGRES_PASSWORD: &str = "claimcheck";
const DEFAULT_POSTGRES_DB: &str = "claimcheck";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Durable, append-only store of validated analysis results per owner
///
/// Lookup is ownership-scoped at this boundary: a record is invisible to any
/// identity other than its owner.
#[async_trait]
pub trait ResultPersister: Send + Sync {
    async fn create(
        &self,
        user_id: i64,
        original_text: &str,
        result: &AnalysisReport,
    ) -> Result<AnalysisRecord, DbError>;

    /// Records owned by the user, newest first
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<AnalysisRecord>, DbError>;

    async fn get_by_id(&self, id: i64, user_id: i64) -> Result<AnalysisRecord, DbError>;
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analyses (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            original_text TEXT NOT NULL,
            result JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_analyses_user_id ON analyses(user_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses(created_at)")
        .execute(pool)
        .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
