//! Error types for the classroom client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the connection (invalid student id)
    #[error("Server rejected the connection: {0}")]
    Rejected(String),

    /// A newer tab registered for the same student
    #[error("Student '{student_id}' was opened in a newer tab (registered at {timestamp})")]
    Deactivated { student_id: String, timestamp: f64 },

    /// The server URL cannot be parsed
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established session dropped
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}
