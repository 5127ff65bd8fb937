//! Data Transfer Objects (DTOs) for the classroom server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event DTOs (both directions)
//! - `http`: HTTP API request/response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
