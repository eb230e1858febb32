//! Analysis orchestration
//!
//! Validates input, gates anonymous callers through admission control,
//! delegates all semantic judgment to the Gemini client, and persists
//! results for authenticated callers. No local scoring or heuristics live
//! here; the model client is the single replaceable judgment component.

use std::sync::Arc;

use crate::db::{DbError, ResultPersister};
use crate::model::{AnalysisRecord, AnalysisReport, Identity};
use crate::service::admission::{AdmissionController, AdmissionDecision};
use crate::service::gemini::{GeminiClient, GeminiError};

const MAX_TEXT_CHARS: usize = 5000;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Too many requests. Please try again later.")]
    RateLimited,

    #[error(transparent)]
    Model(#[from] GeminiError),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Coordinates admission control, model evaluation, and persistence
pub struct AnalysisService {
    admission: AdmissionController,
    client: GeminiClient,
    repository: Arc<dyn ResultPersister>,
}

impl AnalysisService {
    pub fn new(
        admission: AdmissionController,
        client: GeminiClient,
        repository: Arc<dyn ResultPersister>,
    ) -> Self {
        Self {
            admission,
            client,
            repository,
        }
    }

    /// Analyze a piece of text on behalf of the given caller
    pub async fn analyze(
        &self,
        text: &str,
        identity: &Identity,
    ) -> Result<AnalysisReport, AnalysisError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::InvalidInput("input text cannot be empty"));
        }
        if trimmed.chars().count() > MAX_TEXT_CHARS {
            return Err(AnalysisError::InvalidInput(
                "input text exceeds 5000 characters",
            ));
        }

        if let Identity::Anonymous { addr } = identity {
            if self.admission.admit(addr) == AdmissionDecision::Rejected {
                tracing::warn!(client = %addr, "Anonymous caller rejected by admission control");
                return Err(AnalysisError::RateLimited);
            }
        }

        let report = self.client.evaluate(text).await?;

        // Result delivery and durability are decoupled: the caller gets the
        // validated report even if the write fails.
        if let Identity::Authenticated { user_id } = identity {
            if let Err(e) = self.repository.create(*user_id, text, &report).await {
                tracing::warn!(error = %e, user_id, "Failed to persist analysis result");
            }
        }

        Ok(report)
    }

    /// All stored analyses for a user, newest first
    pub async fn history(&self, user_id: i64) -> Result<Vec<AnalysisRecord>, AnalysisError> {
        Ok(self.repository.list_by_owner(user_id).await?)
    }

    /// A single stored analysis, scoped to its owner
    pub async fn history_entry(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<AnalysisRecord, AnalysisError> {
        Ok(self.repository.get_by_id(id, user_id).await?)
    }
}
