//! Events fanned out to connections.
//!
//! Room events reach the connections associated with one class through [`super::MessagePusher`];
//! global events reach every live connection in every room through a [`GlobalEventBus`].

use async_trait::async_trait;

use super::{QuestionStatus, QuestionText, RegistrationTimestamp, StudentId};

/// Event delivered to the connections of one class room.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    NewQuestion {
        index: usize,
        question: QuestionText,
        answer: Option<String>,
    },
    QuestionStatusUpdate {
        index: usize,
        status: QuestionStatus,
    },
    QuestionAnswered {
        index: usize,
        answer: String,
    },
}

/// Event delivered to every live connection regardless of room.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobalEvent {
    /// Tabs of `student_id` registered before `timestamp` should deactivate themselves.
    DeactivateOldTab {
        student_id: StudentId,
        timestamp: RegistrationTimestamp,
    },
}

/// Publish side of the global bus. Every event reaches every live connection.
#[async_trait]
pub trait GlobalEventBus: Send + Sync {
    /// Returns the number of connections the event was queued for.
    async fn publish(&self, event: GlobalEvent) -> usize;
}
