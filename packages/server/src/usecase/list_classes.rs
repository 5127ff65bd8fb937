//! UseCase: クラス一覧取得（クエリ）

use std::sync::Arc;

use crate::domain::{ClassId, PresenceTracker};

/// クラス一覧取得のユースケース
pub struct ListClassesUseCase {
    presence: Arc<dyn PresenceTracker>,
}

impl ListClassesUseCase {
    pub fn new(presence: Arc<dyn PresenceTracker>) -> Self {
        Self { presence }
    }

    /// 学生が一度でも登録したクラスの一覧（ID 順）
    pub async fn execute(&self) -> Vec<ClassId> {
        self.presence.classes().await
    }
}
