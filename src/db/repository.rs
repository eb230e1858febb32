//! Repository for analysis record database operations

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::AnalysisRow;
use super::{DbError, ResultPersister};
use crate::model::{AnalysisRecord, AnalysisReport};

/// PostgreSQL-backed persister for analysis records
#[derive(Clone)]
pub struct AnalysisRepository {
    pool: PgPool,
}

impl AnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultPersister for AnalysisRepository {
    async fn create(
        &self,
        user_id: i64,
        original_text: &str,
        result: &AnalysisReport,
    ) -> Result<AnalysisRecord, DbError> {
        let result_json =
            serde_json::to_value(result).map_err(|e| DbError::Serialization(e.to_string()))?;

        let row: AnalysisRow = sqlx::query_as(
            r#"
            INSERT INTO analyses (user_id, original_text, result)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, original_text, result, created_at
            "#,
        )
        .bind(user_id)
        .bind(original_text)
        .bind(&result_json)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = row.id, user_id, "Stored analysis record");

        row.into_domain().map_err(DbError::Serialization)
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<AnalysisRecord>, DbError> {
        let rows: Vec<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, original_text, result, created_at
            FROM analyses
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    async fn get_by_id(&self, id: i64, user_id: i64) -> Result<AnalysisRecord, DbError> {
        // Ownership is part of the predicate: someone else's id looks like
        // a missing record, not a forbidden one.
        let row: AnalysisRow = sqlx::query_as(
            r#"
            SELECT id, user_id, original_text, result, created_at
            FROM analyses
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }
}
