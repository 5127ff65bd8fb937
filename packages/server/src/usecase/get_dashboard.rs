//! UseCase: ダッシュボード取得（クエリ）
//!
//! 問い合わせのたびに在室状況と質問ログから再計算する。キャッシュはしない。

use std::sync::Arc;

use crate::domain::{
    ClassId, ColorFractions, Dashboard, PresenceError, PresenceTracker, QuestionQueue,
};

use super::error::DashboardError;

/// ダッシュボード取得のユースケース
pub struct GetDashboardUseCase {
    presence: Arc<dyn PresenceTracker>,
    queue: Arc<dyn QuestionQueue>,
}

impl GetDashboardUseCase {
    pub fn new(presence: Arc<dyn PresenceTracker>, queue: Arc<dyn QuestionQueue>) -> Self {
        Self { presence, queue }
    }

    pub async fn execute(&self, class_id: String) -> Result<Dashboard, DashboardError> {
        let class_id = ClassId::new(class_id)?;
        let questions = self.queue.questions(&class_id).await.ok();

        let (student_count, active_student_count, color_fractions) =
            match self.presence_summary(&class_id).await {
                Ok(summary) => summary,
                // 質問だけが投稿されたクラスは在室者 0 として扱う
                Err(PresenceError::ClassNotFound(_)) if questions.is_some() => {
                    (0, 0, ColorFractions::default())
                }
                Err(_) => return Err(DashboardError::ClassNotFound(class_id.into_string())),
            };

        Ok(Dashboard {
            class_id,
            student_count,
            active_student_count,
            color_fractions,
            questions: questions.unwrap_or_default(),
        })
    }

    async fn presence_summary(
        &self,
        class_id: &ClassId,
    ) -> Result<(usize, usize, ColorFractions), PresenceError> {
        let total = self.presence.total_count(class_id).await?;
        let active = self.presence.active_count(class_id).await?;
        let fractions = self.presence.color_fractions(class_id).await?;
        Ok((total, active, fractions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ColorSignal, QuestionText, Timestamp},
        usecase::test_support::{TestContext, class_id, student_id},
    };

    fn create_usecase(ctx: &TestContext) -> GetDashboardUseCase {
        GetDashboardUseCase::new(ctx.presence.clone(), ctx.queue.clone())
    }

    #[tokio::test]
    async fn test_dashboard_aggregates_room() {
        // テスト項目: ダッシュボードに累計人数・アクティブ人数・色の割合・質問が含まれる
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (_a, _rx_a) = ctx.join("alice", "cs50", 100.0).await;
        let (_b, _rx_b) = ctx.join("bob", "cs50", 100.0).await;
        ctx.presence
            .set_color(&student_id("alice"), ColorSignal::Green)
            .await
            .unwrap();
        ctx.presence
            .set_color(&student_id("bob"), ColorSignal::Red)
            .await
            .unwrap();
        ctx.queue
            .submit(
                &class_id("cs50"),
                QuestionText::new("what is a heap?".to_string()),
                Timestamp::new(0),
            )
            .await;

        // when (操作):
        let dashboard = usecase.execute("cs50".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(dashboard.student_count, 2);
        assert_eq!(dashboard.active_student_count, 2);
        assert_eq!(dashboard.color_fractions.green, 0.5);
        assert_eq!(dashboard.color_fractions.red, 0.5);
        assert_eq!(dashboard.questions.len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_unknown_class() {
        // テスト項目: 未知のクラスは NotFound
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);

        let result = usecase.execute("nowhere".to_string()).await;

        assert_eq!(result, Err(DashboardError::ClassNotFound("nowhere".to_string())));
    }

    #[tokio::test]
    async fn test_dashboard_questions_only_class() {
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        ctx.queue
            .submit(
                &class_id("algo101"),
                QuestionText::new("q0".to_string()),
                Timestamp::new(0),
            )
            .await;

        let dashboard = usecase.execute("algo101".to_string()).await.unwrap();

        assert_eq!(dashboard.active_student_count, 0);
        assert_eq!(dashboard.color_fractions.sum(), 0.0);
        assert_eq!(dashboard.questions.len(), 1);
    }
}
