//! UseCase テスト用のインメモリ構成

use std::sync::Arc;

use fastcups_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ClassId, ConnectionId, MessagePusher, PresenceTracker, RegistrationTimestamp,
        SessionRegistry, StudentId, Timestamp,
    },
    infrastructure::{
        event_bus::PusherEventBus,
        message_pusher::WebSocketMessagePusher,
        metrics::DroppedEventCounters,
        repository::{
            InMemoryContextRegistry, InMemoryPresenceTracker, InMemoryQuestionQueue,
            InMemorySessionRegistry,
        },
    },
};

use super::fanout::RoomFanout;

pub(crate) const FIXED_NOW: i64 = 1672498800123;

pub(crate) struct TestContext {
    pub sessions: Arc<InMemorySessionRegistry>,
    pub presence: Arc<InMemoryPresenceTracker>,
    pub queue: Arc<InMemoryQuestionQueue>,
    pub contexts: Arc<InMemoryContextRegistry>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub event_bus: Arc<PusherEventBus>,
    pub counters: Arc<DroppedEventCounters>,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    pub fn new() -> Self {
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        Self {
            sessions: Arc::new(InMemorySessionRegistry::new()),
            presence: Arc::new(InMemoryPresenceTracker::new()),
            queue: Arc::new(InMemoryQuestionQueue::new()),
            contexts: Arc::new(InMemoryContextRegistry::new()),
            event_bus: Arc::new(PusherEventBus::new(message_pusher.clone())),
            message_pusher,
            counters: Arc::new(DroppedEventCounters::new()),
            clock: Arc::new(FixedClock::new(FIXED_NOW)),
        }
    }

    pub fn fanout(&self) -> Arc<RoomFanout> {
        Arc::new(RoomFanout::new(
            self.sessions.clone(),
            self.presence.clone(),
            self.message_pusher.clone(),
        ))
    }

    /// 接続を開き、送信チャネルの受信側を返す
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.sessions.open(Timestamp::new(FIXED_NOW)).await;
        self.message_pusher.register_client(id, tx).await;
        (id, rx)
    }

    /// 接続を開き、学生としてクラスに登録する
    pub async fn join(
        &self,
        student: &str,
        class: &str,
        timestamp: f64,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (id, rx) = self.connect().await;
        self.sessions
            .bind(&id, student_id(student), RegistrationTimestamp::new(timestamp).unwrap())
            .await
            .unwrap();
        self.presence
            .register(class_id(class), student_id(student), id)
            .await;
        (id, rx)
    }
}

pub(crate) fn student_id(value: &str) -> StudentId {
    StudentId::new(value.to_string()).unwrap()
}

pub(crate) fn class_id(value: &str) -> ClassId {
    ClassId::new(value.to_string()).unwrap()
}

/// 受信済みのフレームを全て JSON として取り出す
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}
