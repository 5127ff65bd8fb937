//! MessagePusher trait 定義
//!
//! 接続へのメッセージ送信（ルーム配信・個別通知）のインターフェース。
//! WebSocket の生成は UI 層、送信チャネルの管理は Infrastructure 層が担当します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// 接続ごとの送信チャネル（JSON テキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャネルを削除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続に送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 登録済みの全接続に送信し、送信できた接続数を返す
    async fn broadcast_all(&self, content: &str) -> usize;
}
