//! Tab Deduplicator
//!
//! 同じ学生 ID で新しいタブが登録されたとき、古いタブに非アクティブ化を指示します。
//! 比較（自分の登録時刻が古いかどうか）はクライアント側で行い、
//! サーバーは登録時刻を全接続に転送するだけです。

use std::sync::Arc;

use crate::domain::{GlobalEvent, GlobalEventBus, RegistrationTimestamp, StudentId};

/// Last-writer-wins tab deduplication over the global event bus.
pub struct TabDeduplicator {
    event_bus: Arc<dyn GlobalEventBus>,
}

impl TabDeduplicator {
    pub fn new(event_bus: Arc<dyn GlobalEventBus>) -> Self {
        Self { event_bus }
    }

    /// Announce a (re)registration to every live connection, the registering tab included.
    pub async fn on_register(
        &self,
        student_id: StudentId,
        timestamp: RegistrationTimestamp,
    ) -> usize {
        let receivers = self
            .event_bus
            .publish(GlobalEvent::DeactivateOldTab {
                student_id: student_id.clone(),
                timestamp,
            })
            .await;
        tracing::debug!(
            student_id = %student_id,
            timestamp = timestamp.value(),
            receivers,
            "Published deactivate-old-tab"
        );
        receivers
    }
}
