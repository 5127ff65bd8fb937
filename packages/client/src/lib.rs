//! Command-line student / teacher client for the fastcups classroom server.
//!
//! A student client registers in a class, reports its understanding color and asks questions.
//! A watching client follows a class's question queue and resolves questions.

mod command;
mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::{ClientMode, ClientOptions, run_client};
