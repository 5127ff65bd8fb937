//! UseCase: 回答コンテキストの登録
//!
//! 資料の取り込みパイプラインが検索インデックスを作成したあとに呼び出す。

use std::sync::Arc;

use crate::domain::{AnswerContext, ClassId, ContextRegistry};

use super::error::AttachContextError;

/// 回答コンテキスト登録のユースケース
pub struct AttachContextUseCase {
    contexts: Arc<dyn ContextRegistry>,
}

impl AttachContextUseCase {
    pub fn new(contexts: Arc<dyn ContextRegistry>) -> Self {
        Self { contexts }
    }

    pub async fn execute(
        &self,
        class_id: String,
        index: String,
    ) -> Result<(ClassId, AnswerContext), AttachContextError> {
        let class_id = ClassId::new(class_id)?;
        let index = index.trim();
        if index.is_empty() {
            return Err(AttachContextError::EmptyIndex);
        }

        let context = AnswerContext::new(index);
        self.contexts.attach(class_id.clone(), context.clone()).await;
        tracing::info!(class_id = %class_id, index = %context.index, "Answer context attached");
        Ok((class_id, context))
    }
}
