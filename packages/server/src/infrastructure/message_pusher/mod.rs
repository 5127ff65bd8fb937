//! メッセージ送信（通知）の実装
//!
//! - `websocket`: WebSocket 接続ごとの送信チャネルを使った実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
