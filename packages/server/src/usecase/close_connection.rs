//! UseCase: 接続終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CloseConnectionUseCase::execute() メソッド
//! - 最後の接続が閉じたときの inactive への強制と、複数タブの場合の維持
//! - 同じ接続の二重クローズ（冪等性）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceTracker, SessionRegistry, StudentId};

/// 接続終了のユースケース
pub struct CloseConnectionUseCase {
    sessions: Arc<dyn SessionRegistry>,
    presence: Arc<dyn PresenceTracker>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl CloseConnectionUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRegistry>,
        presence: Arc<dyn PresenceTracker>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            sessions,
            presence,
            message_pusher,
        }
    }

    /// 接続終了を実行し、バインドされていた学生を返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<StudentId> {
        self.message_pusher.unregister_client(connection_id).await;

        let student_id = match self.sessions.close(connection_id).await {
            Ok(student_id) => student_id?,
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, "Connection already closed: {}", e);
                return None;
            }
        };

        self.presence.disconnect(&student_id, connection_id).await;
        tracing::info!(connection_id = %connection_id, student_id = %student_id, "Connection closed");
        Some(student_id)
    }
}
