//! UseCase: 学生登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterStudentUseCase::execute() メソッド
//! - 接続のバインド、クラスの移動、タブ重複排除の通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回登録、同じ学生の新しいタブ、同じ接続からのクラス移動
//! - 異常系：student_id なしの接続、別の学生に登録済みの接続、閉じた接続

use std::sync::Arc;

use crate::domain::{
    ClassId, ConnectionId, PresenceTracker, RegistrationTimestamp, SessionRegistry, StudentId,
    TabDeduplicator,
};

use super::error::RegisterError;

/// 登録結果
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub student_id: StudentId,
    pub class_id: ClassId,
    /// 移動前のクラス
    pub previous_class: Option<ClassId>,
}

/// 学生登録のユースケース
pub struct RegisterStudentUseCase {
    sessions: Arc<dyn SessionRegistry>,
    presence: Arc<dyn PresenceTracker>,
    deduplicator: Arc<TabDeduplicator>,
}

impl RegisterStudentUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRegistry>,
        presence: Arc<dyn PresenceTracker>,
        deduplicator: Arc<TabDeduplicator>,
    ) -> Self {
        Self {
            sessions,
            presence,
            deduplicator,
        }
    }

    /// 学生登録を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 登録する接続
    /// * `student_id` - 接続時に渡された学生 ID（観測専用の接続では `None`）
    /// * `class_id` - 参加するクラス（未検証の文字列）
    /// * `timestamp` - クライアントが送った登録時刻
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        student_id: Option<StudentId>,
        class_id: String,
        timestamp: f64,
    ) -> Result<Registration, RegisterError> {
        let student_id = student_id.ok_or(RegisterError::MissingStudentId)?;
        let class_id = ClassId::new(class_id)?;
        let timestamp = RegistrationTimestamp::new(timestamp)?;

        // 1. 接続を学生にバインド（同じ学生で再登録する場合はバインド済みのまま）
        match self.sessions.resolve(connection_id).await? {
            Some(bound) if bound == student_id => {}
            Some(_) | None => {
                self.sessions
                    .bind(connection_id, student_id.clone(), timestamp)
                    .await?;
            }
        }

        // 2. クラスを移動（色は初回のみ inactive で初期化）
        let previous_class = self
            .presence
            .register(class_id.clone(), student_id.clone(), *connection_id)
            .await;

        // 3. 古いタブに非アクティブ化を指示
        self.deduplicator.on_register(student_id.clone(), timestamp).await;

        tracing::info!(
            connection_id = %connection_id,
            student_id = %student_id,
            class_id = %class_id,
            timestamp = timestamp.value(),
            "Student registered"
        );

        Ok(Registration {
            student_id,
            class_id,
            previous_class,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ColorSignal, SessionError},
        usecase::test_support::{TestContext, class_id, drain, student_id},
    };

    fn create_usecase(ctx: &TestContext) -> RegisterStudentUseCase {
        RegisterStudentUseCase::new(
            ctx.sessions.clone(),
            ctx.presence.clone(),
            Arc::new(TabDeduplicator::new(ctx.event_bus.clone())),
        )
    }

    #[tokio::test]
    async fn test_register_binds_and_joins_class() {
        // テスト項目: 登録すると接続がバインドされ、クラスのメンバーになる
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (conn, _rx) = ctx.connect().await;

        // when (操作):
        let result = usecase
            .execute(&conn, Some(student_id("alice")), "cs50".to_string(), 100.0)
            .await;

        // then (期待する結果):
        let registration = result.unwrap();
        assert_eq!(registration.previous_class, None);
        assert_eq!(ctx.sessions.resolve(&conn).await, Ok(Some(student_id("alice"))));
        assert_eq!(
            ctx.presence.members(&class_id("cs50")).await,
            Ok(vec![student_id("alice")])
        );
        assert_eq!(
            ctx.presence.color_of(&student_id("alice")).await,
            Ok(ColorSignal::Inactive)
        );
    }

    #[tokio::test]
    async fn test_register_publishes_deactivate_old_tab() {
        // テスト項目: 新しいタブの登録で deactivate-old-tab が全接続に発行され、色は保持される
        // given (前提条件): alice が T1@100 で cs50 に参加し green
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (tab1, mut rx1) = ctx.connect().await;
        usecase
            .execute(&tab1, Some(student_id("alice")), "cs50".to_string(), 100.0)
            .await
            .unwrap();
        ctx.presence
            .set_color(&student_id("alice"), ColorSignal::Green)
            .await
            .unwrap();
        drain(&mut rx1);

        // when (操作): alice が T2@200 で再登録
        let (tab2, mut rx2) = ctx.connect().await;
        usecase
            .execute(&tab2, Some(student_id("alice")), "cs50".to_string(), 200.0)
            .await
            .unwrap();

        // then (期待する結果): 古いタブにも新しいタブにも登録時刻付きで届く
        for frames in [drain(&mut rx1), drain(&mut rx2)] {
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["type"], "deactivate-old-tab");
            assert_eq!(frames[0]["student_id"], "alice");
            assert_eq!(frames[0]["timestamp"], 200.0);
        }
        assert_eq!(
            ctx.presence.color_of(&student_id("alice")).await,
            Ok(ColorSignal::Green)
        );
        assert_eq!(ctx.presence.active_count(&class_id("cs50")).await, Ok(1));
    }

    #[tokio::test]
    async fn test_register_same_connection_moves_class() {
        // テスト項目: 同じ接続から別のクラスに登録し直すと移動する
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (conn, _rx) = ctx.connect().await;
        usecase
            .execute(&conn, Some(student_id("alice")), "a".to_string(), 1.0)
            .await
            .unwrap();

        // when (操作):
        let registration = usecase
            .execute(&conn, Some(student_id("alice")), "b".to_string(), 2.0)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(registration.previous_class, Some(class_id("a")));
        assert_eq!(ctx.presence.members(&class_id("a")).await, Ok(vec![]));
        assert_eq!(
            ctx.presence.members(&class_id("b")).await,
            Ok(vec![student_id("alice")])
        );
    }

    #[tokio::test]
    async fn test_register_without_student_id() {
        // テスト項目: student_id を持たない接続は登録できない
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (conn, _rx) = ctx.connect().await;

        let result = usecase.execute(&conn, None, "cs50".to_string(), 1.0).await;

        assert_eq!(result, Err(RegisterError::MissingStudentId));
        assert!(ctx.presence.classes().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_closed_connection_is_dropped() {
        // テスト項目: 閉じた接続からの登録は NotFound となり、状態は変化しない
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (conn, _rx) = ctx.connect().await;
        ctx.sessions.close(&conn).await.unwrap();

        // when (操作):
        let result = usecase
            .execute(&conn, Some(student_id("alice")), "cs50".to_string(), 1.0)
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RegisterError::Session(SessionError::ConnectionNotFound(conn)))
        );
        assert!(ctx.presence.classes().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_timestamp() {
        let ctx = TestContext::new();
        let usecase = create_usecase(&ctx);
        let (conn, _rx) = ctx.connect().await;

        let result = usecase
            .execute(&conn, Some(student_id("alice")), "cs50".to_string(), f64::INFINITY)
            .await;

        assert_eq!(result.unwrap_err().kind(), crate::domain::ErrorKind::InvalidArgument);
    }
}
