//! Database row types for stored analyses

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::model::AnalysisRecord;

#[derive(Debug, FromRow)]
pub struct AnalysisRow {
    pub id: i64,
    pub user_id: i64,
    pub original_text: String,
    pub result: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRow {
    /// Convert to the domain record, re-validating the stored result shape
    pub fn into_domain(self) -> Result<AnalysisRecord, String> {
        let result = serde_json::from_value(self.result).map_err(|e| e.to_string())?;

        Ok(AnalysisRecord {
            id: self.id,
            user_id: self.user_id,
            original_text: self.original_text,
            result,
            created_at: self.created_at,
        })
    }
}
