//! InMemory Question Queue 実装

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    ClassId, Question, QuestionError, QuestionLog, QuestionQueue, QuestionStatus, QuestionText,
    Resolution, Timestamp,
};

/// インメモリ Question Queue 実装
///
/// クラスごとの質問ログを個別の `Mutex` で保護する。
#[derive(Default)]
pub struct InMemoryQuestionQueue {
    logs: RwLock<HashMap<ClassId, Arc<Mutex<QuestionLog>>>>,
}

impl InMemoryQuestionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    async fn log(&self, class_id: &ClassId) -> Result<Arc<Mutex<QuestionLog>>, QuestionError> {
        self.logs
            .read()
            .await
            .get(class_id)
            .cloned()
            .ok_or_else(|| QuestionError::ClassNotFound(class_id.to_string()))
    }

    async fn log_or_insert(&self, class_id: &ClassId) -> Arc<Mutex<QuestionLog>> {
        if let Ok(log) = self.log(class_id).await {
            return log;
        }
        let mut logs = self.logs.write().await;
        logs.entry(class_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(QuestionLog::new(class_id.clone()))))
            .clone()
    }
}

#[async_trait]
impl QuestionQueue for InMemoryQuestionQueue {
    async fn submit(
        &self,
        class_id: &ClassId,
        text: QuestionText,
        submitted_at: Timestamp,
    ) -> usize {
        let log = self.log_or_insert(class_id).await;
        let mut log = log.lock().await;
        log.append(text, submitted_at)
    }

    async fn resolve(
        &self,
        class_id: &ClassId,
        index: usize,
        resolution: Resolution,
    ) -> Result<QuestionStatus, QuestionError> {
        let log = self.log(class_id).await?;
        let mut log = log.lock().await;
        log.resolve(index, resolution)
    }

    async fn set_answer(
        &self,
        class_id: &ClassId,
        index: usize,
        answer: String,
    ) -> Result<(), QuestionError> {
        let log = self.log(class_id).await?;
        let mut log = log.lock().await;
        log.set_answer(index, answer)
    }

    async fn questions(&self, class_id: &ClassId) -> Result<Vec<Question>, QuestionError> {
        let log = self.log(class_id).await?;
        let log = log.lock().await;
        Ok(log.questions().to_vec())
    }

    async fn len(&self, class_id: &ClassId) -> usize {
        match self.log(class_id).await {
            Ok(log) => log.lock().await.len(),
            Err(_) => 0,
        }
    }
}
