//! UseCase: 色シグナルの変更

use std::sync::Arc;

use crate::domain::{ClassId, ColorSignal, ConnectionId, PresenceTracker, SessionRegistry};

use super::error::ChangeColorError;

/// 色変更のユースケース
pub struct ChangeColorUseCase {
    sessions: Arc<dyn SessionRegistry>,
    presence: Arc<dyn PresenceTracker>,
}

impl ChangeColorUseCase {
    pub fn new(sessions: Arc<dyn SessionRegistry>, presence: Arc<dyn PresenceTracker>) -> Self {
        Self { sessions, presence }
    }

    /// 接続の学生の色を更新し、所属クラスを返す
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        color: &str,
    ) -> Result<Option<ClassId>, ChangeColorError> {
        let color: ColorSignal = color.parse()?;
        let student_id = self
            .sessions
            .resolve(connection_id)
            .await?
            .ok_or(ChangeColorError::NotRegistered)?;

        let class_id = self.presence.set_color(&student_id, color).await?;
        tracing::debug!(student_id = %student_id, color = %color, "Color updated");
        Ok(class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ValueObjectError,
        usecase::test_support::{TestContext, class_id, student_id},
    };

    fn create_usecase(ctx: &TestContext) -> ChangeColorUseCase {
        ChangeColorUseCase::new(ctx.sessions.clone(), ctx.presence.clone())
    }

    #[tokio::test]
    async fn test_change_color_success() {
        // テスト項目: 登録済みの接続から色を変更できる
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (conn, _rx) = ctx.join("alice", "cs50", 100.0).await;

        // when (操作):
        let result = usecase.execute(&conn, "green").await;

        // then (期待する結果):
        assert_eq!(result, Ok(Some(class_id("cs50"))));
        assert_eq!(
            ctx.presence.color_of(&student_id("alice")).await,
            Ok(ColorSignal::Green)
        );
        let fractions = ctx.presence.color_fractions(&class_id("cs50")).await.unwrap();
        assert_eq!(fractions.green, 1.0);
    }

    #[tokio::test]
    async fn test_change_color_unknown_name() {
        // テスト項目: 未知の色名は InvalidArgument として拒否され、色は変わらない
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (conn, _rx) = ctx.join("alice", "cs50", 100.0).await;

        // when (操作):
        let result = usecase.execute(&conn, "blue").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ChangeColorError::InvalidValue(ValueObjectError::UnknownColor(
                "blue".to_string()
            )))
        );
        assert_eq!(
            ctx.presence.color_of(&student_id("alice")).await,
            Ok(ColorSignal::Inactive)
        );
    }

    #[tokio::test]
    async fn test_change_color_before_register() {
        // テスト項目: 未登録の接続からの色変更は NotFound
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (conn, _rx) = ctx.connect().await;

        let result = usecase.execute(&conn, "red").await;

        assert_eq!(result, Err(ChangeColorError::NotRegistered));
    }
}
