//! UseCase 層のエラー定義
//!
//! それぞれのエラーは [`ErrorKind`] に対応付けられ、UI 層はこの分類でログとカウンタを記録します。

use thiserror::Error;

use crate::domain::{ErrorKind, PresenceError, QuestionError, SessionError, ValueObjectError};

/// 学生登録のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegisterError {
    #[error("connection did not supply a student_id")]
    MissingStudentId,

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl RegisterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegisterError::MissingStudentId => ErrorKind::InvalidArgument,
            RegisterError::InvalidValue(e) => e.kind(),
            RegisterError::Session(e) => e.kind(),
        }
    }
}

/// 色変更のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChangeColorError {
    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("connection has not registered yet")]
    NotRegistered,

    #[error(transparent)]
    Presence(#[from] PresenceError),
}

impl ChangeColorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChangeColorError::InvalidValue(e) => e.kind(),
            ChangeColorError::Session(e) => e.kind(),
            ChangeColorError::NotRegistered => ErrorKind::NotFound,
            ChangeColorError::Presence(e) => e.kind(),
        }
    }
}

/// 質問投稿のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitQuestionError {
    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),
}

impl SubmitQuestionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitQuestionError::InvalidValue(e) => e.kind(),
        }
    }
}

/// 質問ステータス更新のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpdateQuestionStatusError {
    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error("question index {0} is negative")]
    NegativeIndex(i64),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

impl UpdateQuestionStatusError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UpdateQuestionStatusError::InvalidValue(e) => e.kind(),
            UpdateQuestionStatusError::NegativeIndex(_) => ErrorKind::InvalidArgument,
            UpdateQuestionStatusError::Question(e) => e.kind(),
        }
    }
}

/// 観測登録のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WatchClassError {
    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl WatchClassError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WatchClassError::InvalidValue(e) => e.kind(),
            WatchClassError::Session(e) => e.kind(),
        }
    }
}

/// ダッシュボード取得のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error("class '{0}' not found")]
    ClassNotFound(String),
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::InvalidValue(e) => e.kind(),
            DashboardError::ClassNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// 回答コンテキスト登録のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttachContextError {
    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error("index name must not be empty")]
    EmptyIndex,
}

impl AttachContextError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArgument
    }
}
