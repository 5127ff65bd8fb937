//! Domain error types.
//!
//! Every error maps onto one [`ErrorKind`]. Mutating events that fail with `NotFound` or
//! `InvalidArgument` are dropped without state change; `UpstreamUnavailable` only ever comes
//! from the answering collaborator and never fails a submission.

use std::fmt;

use thiserror::Error;

use super::{entity::QuestionStatus, value_object::ConnectionId};

/// Coarse error classification used for logging and dropped-event counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    UpstreamUnavailable,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 3] = [
        ErrorKind::NotFound,
        ErrorKind::InvalidArgument,
        ErrorKind::UpstreamUnavailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value Object の生成に失敗した場合のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("unknown color '{0}'")]
    UnknownColor(String),

    #[error("registration timestamp must be a finite number")]
    NonFiniteTimestamp,
}

impl ValueObjectError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}

/// Session Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("connection {0} not found")]
    ConnectionNotFound(ConnectionId),

    #[error("connection {connection_id} is already bound to '{student_id}'")]
    AlreadyBound {
        connection_id: ConnectionId,
        student_id: String,
    },
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::ConnectionNotFound(_) => ErrorKind::NotFound,
            SessionError::AlreadyBound { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Presence Tracker errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenceError {
    #[error("student '{0}' has never registered")]
    StudentNotFound(String),

    #[error("class '{0}' not found")]
    ClassNotFound(String),
}

impl PresenceError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::NotFound
    }
}

/// Question Queue errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("class '{0}' has no questions")]
    ClassNotFound(String),

    #[error("question index {index} out of range (queue length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("question {index} is already {status}")]
    AlreadyTerminal { index: usize, status: QuestionStatus },
}

impl QuestionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuestionError::ClassNotFound(_) => ErrorKind::NotFound,
            QuestionError::IndexOutOfRange { .. } | QuestionError::AlreadyTerminal { .. } => {
                ErrorKind::InvalidArgument
            }
        }
    }
}

/// Answering collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("answer service unavailable: {0}")]
    Unavailable(String),

    #[error("answer service timed out after {0} seconds")]
    Timeout(u64),

    #[error("answer service returned no result")]
    NoResult,
}

impl AnswerError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::UpstreamUnavailable
    }
}

/// メッセージ送信（通知）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection {0} is not registered for push")]
    ConnectionNotFound(ConnectionId),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

impl MessagePushError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MessagePushError::ConnectionNotFound(_) => ErrorKind::NotFound,
            MessagePushError::PushFailed(_) => ErrorKind::UpstreamUnavailable,
        }
    }
}
