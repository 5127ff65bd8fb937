//! ルーム配信
//!
//! クラスに関連付いた全ての接続（現在のメンバーの全タブと、クラスの観測者）へ
//! ルームイベントを送信します。

use std::sync::Arc;

use crate::{
    domain::{ClassId, MessagePusher, PresenceTracker, RoomEvent, SessionRegistry},
    infrastructure::dto::websocket::ServerEvent,
};

/// Fans room events out to every connection associated with a class.
pub struct RoomFanout {
    sessions: Arc<dyn SessionRegistry>,
    presence: Arc<dyn PresenceTracker>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomFanout {
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

    /// Publish `event` to the room and return how many connections were targeted.
    pub async fn publish(&self, class_id: &ClassId, event: RoomEvent) -> usize {
        let payload = match ServerEvent::from(event).to_json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(class_id = %class_id, "Failed to serialize room event: {}", e);
                return 0;
            }
        };

        // 未知のクラスはメンバーなし（観測者のみ）として扱う
        let members = self.presence.members(class_id).await.unwrap_or_default();
        let targets = self.sessions.connections_for(&members, class_id).await;
        let count = targets.len();

        if let Err(e) = self.message_pusher.broadcast(targets, &payload).await {
            tracing::warn!(class_id = %class_id, "Room broadcast failed: {}", e);
        }
        count
    }
}
