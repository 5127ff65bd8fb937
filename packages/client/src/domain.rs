//! Domain logic for client-side operations.
//!
//! Pure functions without side effects, so they are easy to test.

use crate::error::ClientError;

/// Decide whether this tab must deactivate after a `deactivate-old-tab` for its own student.
///
/// Only a strictly newer registration deactivates; equal timestamps keep the tab alive, which
/// also covers the notice a tab receives for its own registration.
pub fn should_deactivate(own_timestamp: f64, broadcast_timestamp: f64) -> bool {
    own_timestamp < broadcast_timestamp
}

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Rejected(_) | ClientError::InvalidUrl(_) | ClientError::Deactivated { .. }
    )
}

/// Count the failed attempt that produced `error`.
///
/// A session that was connected before it dropped starts a fresh run of attempts.
pub fn next_reconnect_count(error: &ClientError, current_attempt: u32) -> u32 {
    match error {
        ClientError::ConnectionLost(_) => 1,
        _ => current_attempt + 1,
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
