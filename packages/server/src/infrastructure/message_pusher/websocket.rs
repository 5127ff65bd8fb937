//! WebSocket を使った MessagePusher 実装
//!
//! WebSocket の受付と送信タスクの生成は UI 層（`ui/handler/websocket.rs`）で行われ、
//! この実装は生成された `UnboundedSender` を接続 ID ごとに保持して送信に使います。
//! 送信は非同期チャネルへの投入だけなので、配信がステートの更新を待たせることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// Key: ConnectionId, Value: 接続の送信チャネル
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(connection_id)
            .ok_or(MessagePushError::ConnectionNotFound(*connection_id))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                // 一部の送信失敗は許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::debug!("Connection '{}' not registered for push, skipping", target);
                }
            }
        }

        Ok(())
    }

    async fn broadcast_all(&self, content: &str) -> usize {
        let clients = self.clients.lock().await;
        let mut delivered = 0;
        for (id, sender) in clients.iter() {
            match sender.send(content.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Failed to push message to connection '{}': {}", id, e),
            }
        }
        delivered
    }
}
