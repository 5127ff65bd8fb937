//! Value Object 定義
//!
//! 識別子やクライアントから受け取る値を、検証済みの型として表現します。
//! 生成時に検証を行うため、ドメイン層の内側では常に妥当な値として扱えます。

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of client-supplied identifiers (student and class ids).
pub const MAX_ID_LENGTH: usize = 128;

fn validate_id(field: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.trim().is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if value.chars().count() > MAX_ID_LENGTH {
        return Err(ValueObjectError::TooLong {
            field,
            max: MAX_ID_LENGTH,
        });
    }
    Ok(())
}

/// Server-generated identifier of one live transport channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Allocate a fresh connection id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque, client-supplied student identity.
///
/// Survives reconnects and page reloads; the server never mints one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_id("student_id", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for StudentId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StudentId> for String {
    fn from(value: StudentId) -> Self {
        value.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Externally supplied class room id. First use creates the room implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassId(String);

impl ClassId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_id("class_id", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClassId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClassId> for String {
    fn from(value: ClassId) -> Self {
        value.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text question submitted by a student.
///
/// Any text is accepted, including blank and very long questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionText(String);

impl QuestionText {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for QuestionText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Client-supplied registration timestamp.
///
/// Only ever compared numerically; arrival order carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RegistrationTimestamp(f64);

impl RegistrationTimestamp {
    pub fn new(value: f64) -> Result<Self, ValueObjectError> {
        if !value.is_finite() {
            return Err(ValueObjectError::NonFiniteTimestamp);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Server-side timestamp (Unix milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// A student's self-reported understanding level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSignal {
    Green,
    Yellow,
    Red,
    #[default]
    Inactive,
}

impl ColorSignal {
    /// The three colors that make up the dashboard distribution.
    pub const ACTIVE: [ColorSignal; 3] = [ColorSignal::Green, ColorSignal::Yellow, ColorSignal::Red];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSignal::Green => "green",
            ColorSignal::Yellow => "yellow",
            ColorSignal::Red => "red",
            ColorSignal::Inactive => "inactive",
        }
    }
}

impl FromStr for ColorSignal {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(ColorSignal::Green),
            "yellow" => Ok(ColorSignal::Yellow),
            "red" => Ok(ColorSignal::Red),
            "inactive" => Ok(ColorSignal::Inactive),
            other => Err(ValueObjectError::UnknownColor(other.to_string())),
        }
    }
}

impl fmt::Display for ColorSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
