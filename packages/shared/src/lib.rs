//! Utilities shared by the fastcups server and client.

pub mod logger;
pub mod time;
