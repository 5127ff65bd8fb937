//! UseCase: 質問ステータスの更新（mark-solved / mark-submitted）

use std::sync::Arc;

use crate::domain::{ClassId, QuestionQueue, QuestionStatus, Resolution, RoomEvent};

use super::{error::UpdateQuestionStatusError, fanout::RoomFanout};

/// 質問ステータス更新のユースケース
pub struct UpdateQuestionStatusUseCase {
    queue: Arc<dyn QuestionQueue>,
    fanout: Arc<RoomFanout>,
}

impl UpdateQuestionStatusUseCase {
    pub fn new(queue: Arc<dyn QuestionQueue>, fanout: Arc<RoomFanout>) -> Self {
        Self { queue, fanout }
    }

    /// pending の質問を終端状態へ遷移させ、成功した場合のみ配信する
    ///
    /// 範囲外のインデックスや終端状態の質問はエラーを返し、状態も配信も変わらない。
    pub async fn execute(
        &self,
        class_id: String,
        index: i64,
        resolution: Resolution,
    ) -> Result<QuestionStatus, UpdateQuestionStatusError> {
        let class_id = ClassId::new(class_id)?;
        let index =
            usize::try_from(index).map_err(|_| UpdateQuestionStatusError::NegativeIndex(index))?;

        let status = self.queue.resolve(&class_id, index, resolution).await?;

        self.fanout
            .publish(&class_id, RoomEvent::QuestionStatusUpdate { index, status })
            .await;
        tracing::info!(class_id = %class_id, index, status = %status, "Question status updated");
        Ok(status)
    }
}
