//! Logging setup utilities for the fastcups binaries.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{}'. Use 'text' or 'json'.", s)),
        }
    }
}

/// Build the default filter directive for a binary.
///
/// Both the library crates and the binary itself log at `default_log_level`.
pub fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    [
        "fastcups_shared",
        "fastcups_server",
        "fastcups_client",
        binary_target.as_str(),
    ]
    .iter()
    .map(|target| format!("{}={}", target, default_log_level))
    .collect::<Vec<_>>()
    .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "fastcups-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
/// * `format` - Plain text for terminals, JSON for log aggregation
///
/// # Examples
///
/// ```no_run
/// use fastcups_shared::logger::{LogFormat, setup_logger};
///
/// setup_logger("fastcups-server", "info", LogFormat::Text);
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into());

    match format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true))
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_target(true))
                .init();
        }
    }
}
