//! InMemory Context Registry 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{AnswerContext, ClassId, ContextRegistry};

/// インメモリ Context Registry 実装
#[derive(Default)]
pub struct InMemoryContextRegistry {
    contexts: RwLock<HashMap<ClassId, AnswerContext>>,
}

impl InMemoryContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 設定ファイルなどで事前に登録されたコンテキストで初期化
    pub fn with_contexts(contexts: HashMap<ClassId, AnswerContext>) -> Self {
        Self {
            contexts: RwLock::new(contexts),
        }
    }
}

#[async_trait]
impl ContextRegistry for InMemoryContextRegistry {
    async fn attach(&self, class_id: ClassId, context: AnswerContext) {
        let mut contexts = self.contexts.write().await;
        if let Some(previous) = contexts.insert(class_id.clone(), context) {
            tracing::info!(class_id = %class_id, previous = %previous.index, "Replaced answer context");
        }
    }

    async fn get(&self, class_id: &ClassId) -> Option<AnswerContext> {
        self.contexts.read().await.get(class_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_attach_replaces_existing_context() {
        // テスト項目: 同じクラスへの再登録は既存のコンテキストを置き換える
        // given (前提条件):
        let cs50 = ClassId::new("cs50".to_string()).unwrap();
        let registry = InMemoryContextRegistry::with_contexts(HashMap::from([(
            cs50.clone(),
            AnswerContext::new("cs50-week1"),
        )]));

        // when (操作):
        registry.attach(cs50.clone(), AnswerContext::new("cs50-week2")).await;

        // then (期待する結果):
        assert_eq!(registry.get(&cs50).await, Some(AnswerContext::new("cs50-week2")));
    }

    #[tokio::test]
    async fn test_get_without_context() {
        let registry = InMemoryContextRegistry::new();
        let cs50 = ClassId::new("cs50".to_string()).unwrap();
        assert_eq!(registry.get(&cs50).await, None);
    }
}
