//! UseCase: 質問投稿処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitQuestionUseCase::execute() メソッド
//! - 質問の追加と new-question の即時配信
//! - 回答コンテキストがある場合の非同期回答と question-answered の配信
//!
//! ### どのような状況を想定しているか
//! - 正常系：コンテキストなし（回答は null のまま）、コンテキストあり（回答が届く）
//! - 異常系：回答サービスの失敗・タイムアウト（質問は残り、回答は null のまま）

use std::{sync::Arc, time::Duration};

use fastcups_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::{
    domain::{
        AnswerContext, AnswerError, Answerer, ClassId, ContextRegistry, QuestionQueue,
        QuestionText, RoomEvent, Timestamp,
    },
    infrastructure::metrics::DroppedEventCounters,
};

use super::{error::SubmitQuestionError, fanout::RoomFanout};

/// Default upper bound on one answer lookup.
pub const DEFAULT_ANSWER_TIMEOUT: Duration = Duration::from_secs(30);

/// 投稿結果
#[derive(Debug)]
pub struct SubmittedQuestion {
    pub index: usize,
    /// 回答の取得タスク（コンテキストがない場合は `None`）
    pub answer_task: Option<JoinHandle<()>>,
}

/// 質問投稿のユースケース
pub struct SubmitQuestionUseCase {
    queue: Arc<dyn QuestionQueue>,
    contexts: Arc<dyn ContextRegistry>,
    answerer: Arc<dyn Answerer>,
    fanout: Arc<RoomFanout>,
    counters: Arc<DroppedEventCounters>,
    clock: Arc<dyn Clock>,
    answer_timeout: Duration,
}

impl SubmitQuestionUseCase {
    pub fn new(
        queue: Arc<dyn QuestionQueue>,
        contexts: Arc<dyn ContextRegistry>,
        answerer: Arc<dyn Answerer>,
        fanout: Arc<RoomFanout>,
        counters: Arc<DroppedEventCounters>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            queue,
            contexts,
            answerer,
            fanout,
            counters,
            clock,
            answer_timeout: DEFAULT_ANSWER_TIMEOUT,
        }
    }

    pub fn with_answer_timeout(mut self, answer_timeout: Duration) -> Self {
        self.answer_timeout = answer_timeout;
        self
    }

    /// 質問投稿を実行
    ///
    /// 質問は回答を待たずに `answer: null` で配信される。
    pub async fn execute(
        &self,
        class_id: String,
        question: String,
    ) -> Result<SubmittedQuestion, SubmitQuestionError> {
        let class_id = ClassId::new(class_id)?;
        let text = QuestionText::new(question);

        // 1. 質問ログに追加
        let submitted_at = Timestamp::new(self.clock.now_millis());
        let index = self
            .queue
            .submit(&class_id, text.clone(), submitted_at)
            .await;

        // 2. 回答なしで即時配信
        let targets = self
            .fanout
            .publish(
                &class_id,
                RoomEvent::NewQuestion {
                    index,
                    question: text.clone(),
                    answer: None,
                },
            )
            .await;
        tracing::info!(class_id = %class_id, index, targets, "Question submitted");

        // 3. コンテキストがあれば回答を非同期に取得
        let answer_task = self
            .contexts
            .get(&class_id)
            .await
            .map(|context| self.spawn_answer_lookup(class_id, index, context, text));

        Ok(SubmittedQuestion { index, answer_task })
    }

    fn spawn_answer_lookup(
        &self,
        class_id: ClassId,
        index: usize,
        context: AnswerContext,
        text: QuestionText,
    ) -> JoinHandle<()> {
        let queue = self.queue.clone();
        let answerer = self.answerer.clone();
        let fanout = self.fanout.clone();
        let counters = self.counters.clone();
        let answer_timeout = self.answer_timeout;

        tokio::spawn(async move {
            let lookup = answerer.answer(&class_id, &context, text.as_str());
            let result = match tokio::time::timeout(answer_timeout, lookup).await {
                Ok(result) => result,
                Err(_) => Err(AnswerError::Timeout(answer_timeout.as_secs())),
            };

            let answer = match result {
                Ok(answer) => answer,
                Err(e) => {
                    counters.record(e.kind());
                    tracing::warn!(
                        class_id = %class_id,
                        index,
                        kind = %e.kind(),
                        reason = %e,
                        "Answer lookup failed, question stays unanswered"
                    );
                    return;
                }
            };

            if let Err(e) = queue.set_answer(&class_id, index, answer.clone()).await {
                counters.record(e.kind());
                tracing::warn!(
                    class_id = %class_id,
                    index,
                    kind = %e.kind(),
                    reason = %e,
                    "Failed to store answer"
                );
                return;
            }
            fanout
                .publish(&class_id, RoomEvent::QuestionAnswered { index, answer })
                .await;
        })
    }
}
