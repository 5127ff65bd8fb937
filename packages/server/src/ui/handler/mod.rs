//! HTTP / WebSocket handlers.

mod http;
mod websocket;

pub use http::{attach_context, get_dashboard, get_stats, health_check, list_classes};
pub use websocket::websocket_handler;
