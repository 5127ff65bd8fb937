//! Live classroom presence and question-queue server.
//!
//! Students report an understanding color and ask questions over WebSocket; teachers watch a
//! per-class dashboard (headcount, color distribution, question queue).

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
