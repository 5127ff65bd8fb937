//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::{next_reconnect_count, should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::run_client_session,
    ui::spawn_line_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// How the client takes part in the class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMode {
    /// Registered student reporting colors and asking questions.
    Student { student_id: String },
    /// Teacher observer following the question queue.
    Watch,
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// WebSocket endpoint, without query string
    pub url: String,
    pub class_id: String,
    pub mode: ClientMode,
}

impl ClientOptions {
    pub(crate) fn who(&self) -> &str {
        match &self.mode {
            ClientMode::Student { student_id } => student_id,
            ClientMode::Watch => "watcher",
        }
    }

    pub(crate) fn prompt(&self) -> String {
        format!("{}@{}> ", self.who(), self.class_id)
    }
}

/// Run the classroom client with reconnection logic
///
/// Returns `Ok` when the user quits or the tab is replaced by a newer one.
pub async fn run_client(options: ClientOptions) -> Result<(), ClientError> {
    let mut input_rx = spawn_line_reader(options.prompt());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            options.url,
            options.who(),
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let e = match run_client_session(&options, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => e,
        };

        if should_exit_immediately(&e) {
            return match e {
                ClientError::Deactivated { .. } => {
                    tracing::info!("{}", e);
                    Ok(())
                }
                other => Err(other),
            };
        }

        tracing::warn!("Session ended: {}", e);
        reconnect_count = next_reconnect_count(&e, reconnect_count);

        if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
            tracing::error!(
                "Failed to reconnect after {} attempts. Exiting.",
                MAX_RECONNECT_ATTEMPTS
            );
            return Err(e);
        }

        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            RECONNECT_INTERVAL_SECS,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
    }
}
