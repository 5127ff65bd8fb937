//! MessagePusher backed global event bus.
//!
//! Global events are serialized once and queued on every registered connection's unbounded
//! outbound channel. Nothing is buffered per subscriber, so a slow connection never loses a
//! directive; it only delays its own socket writes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{GlobalEvent, GlobalEventBus, MessagePusher},
    infrastructure::dto::websocket::ServerEvent,
};

pub struct PusherEventBus {
    message_pusher: Arc<dyn MessagePusher>,
}

impl PusherEventBus {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }
}

#[async_trait]
impl GlobalEventBus for PusherEventBus {
    async fn publish(&self, event: GlobalEvent) -> usize {
        let payload = match ServerEvent::from(event).to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize global event: {}", e);
                return 0;
            }
        };
        self.message_pusher.broadcast_all(&payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionId, RegistrationTimestamp, StudentId},
        infrastructure::message_pusher::WebSocketMessagePusher,
    };
    use tokio::sync::mpsc;

    fn deactivate(student: &str, ts: f64) -> GlobalEvent {
        GlobalEvent::DeactivateOldTab {
            student_id: StudentId::new(student.to_string()).unwrap(),
            timestamp: RegistrationTimestamp::new(ts).unwrap(),
        }
    }

    async fn setup(count: usize) -> (PusherEventBus, Vec<mpsc::UnboundedReceiver<String>>) {
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let mut receivers = Vec::new();
        for _ in 0..count {
            let (tx, rx) = mpsc::unbounded_channel();
            pusher.register_client(ConnectionId::generate(), tx).await;
            receivers.push(rx);
        }
        (PusherEventBus::new(pusher), receivers)
    }

    #[tokio::test]
    async fn test_publish_reaches_every_connection() {
        // テスト項目: 発行したイベントは全ての接続に deactivate-old-tab として届く
        // given (前提条件):
        let (bus, mut receivers) = setup(2).await;

        // when (操作):
        let receivers_count = bus.publish(deactivate("alice", 200.0)).await;

        // then (期待する結果):
        assert_eq!(receivers_count, 2);
        for rx in receivers.iter_mut() {
            let frame: serde_json::Value =
                serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            assert_eq!(frame["type"], "deactivate-old-tab");
            assert_eq!(frame["student_id"], "alice");
            assert_eq!(frame["timestamp"], 200.0);
        }
    }

    #[tokio::test]
    async fn test_publish_without_connections() {
        let (bus, _) = setup(0).await;
        assert_eq!(bus.publish(deactivate("alice", 1.0)).await, 0);
    }

    #[tokio::test]
    async fn test_unread_connection_keeps_every_event() {
        // テスト項目: 読み出しが追いつかない接続でも、古いイベントを失わない
        // given (前提条件):
        let (bus, mut receivers) = setup(1).await;

        // when (操作): 読み出す前に大量に発行する
        for ts in 0..1000 {
            bus.publish(deactivate("alice", ts as f64)).await;
        }

        // then (期待する結果):
        let rx = &mut receivers[0];
        for ts in 0..1000 {
            let frame: serde_json::Value =
                serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            assert_eq!(frame["timestamp"], ts as f64);
        }
        assert!(rx.try_recv().is_err());
    }
}
