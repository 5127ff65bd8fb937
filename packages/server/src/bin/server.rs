//! Live classroom presence and question-queue server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fastcups-server
//! cargo run --bin fastcups-server -- --host 0.0.0.0 --port 3000 --config fastcups.toml
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use fastcups_server::{
    config::Config,
    domain::Answerer,
    infrastructure::answerer::{NullAnswerer, SearchAnswerer},
    ui::{Server, state::AppState},
};
use fastcups_shared::logger::{LogFormat, setup_logger};

#[derive(Parser, Debug)]
#[command(name = "fastcups-server")]
#[command(about = "Classroom presence and question-queue server", long_about = None)]
struct Args {
    /// Host address to bind the server to (overrides the config file)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port number to bind the server to (overrides the config file)
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Path to a TOML config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log output format: text or json
    #[arg(long, default_value = "text")]
    log_format: LogFormat,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level, args.log_format);

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    let contexts = match config.answer_contexts() {
        Ok(contexts) => contexts,
        Err(e) => {
            tracing::error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };

    let answerer: Arc<dyn Answerer> = match &config.answerer.search_url {
        Some(url) => {
            tracing::info!("Answering questions via search service at {}", url);
            Arc::new(
                SearchAnswerer::new(url.clone())
                    .with_repository(config.answerer.repository.clone())
                    .with_top_k(config.answerer.top_k),
            )
        }
        None => {
            tracing::info!("No search service configured; questions stay unanswered");
            Arc::new(NullAnswerer)
        }
    };

    let state = AppState::in_memory(answerer, contexts, config.answerer.timeout());

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    if let Err(e) = Server::new(Arc::new(state)).run(host, port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
