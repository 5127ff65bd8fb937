//! UseCase: 接続開始処理

use std::sync::Arc;

use fastcups_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, SessionRegistry, Timestamp};

/// 接続開始のユースケース
pub struct OpenConnectionUseCase {
    sessions: Arc<dyn SessionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl OpenConnectionUseCase {
    pub fn new(
        sessions: Arc<dyn SessionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            message_pusher,
            clock,
        }
    }

    /// 未バインドの接続を作成し、送信チャネルを登録する
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let opened_at = Timestamp::new(self.clock.now_millis());
        let connection_id = self.sessions.open(opened_at).await;
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        connection_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::TestContext;

    #[tokio::test]
    async fn test_open_connection_registers_channel() {
        // テスト項目: 接続を開くと未バインドの接続が作られ、送信チャネルが使えるようになる
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = OpenConnectionUseCase::new(
            ctx.sessions.clone(),
            ctx.message_pusher.clone(),
            ctx.clock.clone(),
        );
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        let id = usecase.execute(tx).await;

        // then (期待する結果):
        assert_eq!(ctx.sessions.resolve(&id).await, Ok(None));
        ctx.message_pusher.push_to(&id, "ping").await.unwrap();
        assert_eq!(rx.recv().await, Some("ping".to_string()));
    }
}
