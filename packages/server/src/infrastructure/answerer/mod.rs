//! Answerer 実装
//!
//! - `search`: 検索サービス（Indexify 互換の `/repositories/<repo>/search`）に問い合わせる実装
//! - `NullAnswerer`: 検索サービスが設定されていない場合の実装（常に即座に失敗する）

pub mod search;

use async_trait::async_trait;

use crate::domain::{AnswerContext, AnswerError, Answerer, ClassId};

pub use search::SearchAnswerer;

/// Answerer used when no search service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAnswerer;

#[async_trait]
impl Answerer for NullAnswerer {
    async fn answer(
        &self,
        _class_id: &ClassId,
        _context: &AnswerContext,
        _question: &str,
    ) -> Result<String, AnswerError> {
        Err(AnswerError::Unavailable(
            "no search service configured".to_string(),
        ))
    }
}
