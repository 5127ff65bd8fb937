//! ドメイン層
//!
//! Value Object・Entity・エラー型と、各コンポーネントのインターフェース（trait）を定義します。
//! このモジュールは他のどの層にも依存しません。

pub mod answerer;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod service;
pub mod value_object;

pub use answerer::{AnswerContext, Answerer};
pub use entity::{
    Binding, ClassRoster, ColorFractions, Connection, Dashboard, Question, QuestionLog,
    QuestionStatus, Resolution, StudentPresence,
};
pub use error::{
    AnswerError, ErrorKind, MessagePushError, PresenceError, QuestionError, SessionError,
    ValueObjectError,
};
pub use event::{GlobalEvent, GlobalEventBus, RoomEvent};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{ContextRegistry, PresenceTracker, QuestionQueue, SessionRegistry};
pub use service::TabDeduplicator;
pub use value_object::{
    ClassId, ColorSignal, ConnectionId, QuestionText, RegistrationTimestamp, StudentId,
    Timestamp, MAX_ID_LENGTH,
};

#[cfg(test)]
pub use answerer::MockAnswerer;
