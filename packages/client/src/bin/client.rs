//! Command-line classroom client with reconnection support.
//!
//! As a student, registers in a class, then sends `/color`, `/ask`, `/solve`, `/submit` commands
//! from stdin (plain text asks a question). With `--watch`, follows the class's question queue
//! as a teacher. Reconnects on disconnection (max 5 attempts with 5 second interval) and exits
//! when the same student opens a newer tab.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fastcups-client -- --student-id alice --class-id cs50
//! cargo run --bin fastcups-client -- --class-id cs50 --watch
//! ```

use clap::Parser;

use fastcups_client::{ClientMode, ClientOptions, run_client};
use fastcups_shared::logger::{LogFormat, setup_logger};

#[derive(Parser, Debug)]
#[command(name = "fastcups-client")]
#[command(about = "Classroom presence client for students and teachers", long_about = None)]
struct Args {
    /// Student ID (required unless --watch)
    #[arg(short = 's', long, required_unless_present = "watch")]
    student_id: Option<String>,

    /// Class to join or watch
    #[arg(short = 'c', long)]
    class_id: String,

    /// Watch the class as a teacher instead of joining as a student
    #[arg(short = 'w', long, conflicts_with = "student_id")]
    watch: bool,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Log output format: text or json
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info", args.log_format);

    let mode = match (args.watch, args.student_id) {
        (false, Some(student_id)) => ClientMode::Student { student_id },
        _ => ClientMode::Watch,
    };
    let options = ClientOptions {
        url: args.url,
        class_id: args.class_id,
        mode,
    };

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
