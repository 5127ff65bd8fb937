//! Infrastructure 層
//!
//! ドメイン層の trait の具体的な実装（インメモリストア、WebSocket 送信、イベントバス、
//! 回答サービス）と、通信用の DTO を提供します。

pub mod answerer;
pub mod dto;
pub mod event_bus;
pub mod message_pusher;
pub mod metrics;
pub mod repository;
