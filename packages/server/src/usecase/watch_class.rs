//! UseCase: 教員ダッシュボードによるクラスの観測

use std::sync::Arc;

use crate::domain::{ClassId, ConnectionId, SessionRegistry};

use super::error::WatchClassError;

/// 観測登録のユースケース
pub struct WatchClassUseCase {
    sessions: Arc<dyn SessionRegistry>,
}

impl WatchClassUseCase {
    pub fn new(sessions: Arc<dyn SessionRegistry>) -> Self {
        Self { sessions }
    }

    /// 接続をクラスのルームイベントの受信者にする（前の観測先は置き換える）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        class_id: String,
    ) -> Result<ClassId, WatchClassError> {
        let class_id = ClassId::new(class_id)?;
        self.sessions
            .watch(connection_id, class_id.clone())
            .await?;
        tracing::info!(connection_id = %connection_id, class_id = %class_id, "Watching class");
        Ok(class_id)
    }
}
