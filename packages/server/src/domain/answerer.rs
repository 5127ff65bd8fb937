//! Answering collaborator seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AnswerError, ClassId};

/// Reference material registered for a class by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerContext {
    /// Search index name the pipeline deposited the material under.
    pub index: String,
}

impl AnswerContext {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
        }
    }
}

/// Produces an answer for a question asked in a class with an attached context.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(
        &self,
        class_id: &ClassId,
        context: &AnswerContext,
        question: &str,
    ) -> Result<String, AnswerError>;
}
