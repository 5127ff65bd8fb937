//! Repository trait 定義
//!
//! ドメイン層が必要とする状態ストアのインターフェースを定義します。
//! 具体的な実装（ロックの持ち方を含む）は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## ロック順序
//!
//! 実装は「学生 → クラス」の順でロックを取得し、読み取り系は先にメンバー集合を
//! スナップショットしてから学生の状態を読む必要があります。

use async_trait::async_trait;

use super::{
    AnswerContext, ClassId, ColorFractions, ColorSignal, ConnectionId, PresenceError,
    Question, QuestionError, RegistrationTimestamp, Resolution, QuestionStatus, QuestionText,
    SessionError, StudentId, Timestamp,
};

/// Session Registry trait
///
/// 接続（ConnectionId）と学生 ID の対応付けを管理する。構造的な情報のみを扱う。
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// 未バインドの接続レコードを作成
    async fn open(&self, opened_at: Timestamp) -> ConnectionId;

    /// 接続を学生 ID に一度だけバインドする
    async fn bind(
        &self,
        connection_id: &ConnectionId,
        student_id: StudentId,
        registered_at: RegistrationTimestamp,
    ) -> Result<(), SessionError>;

    /// 接続レコードを削除し、バインドされていた学生 ID を返す
    async fn close(&self, connection_id: &ConnectionId) -> Result<Option<StudentId>, SessionError>;

    /// 接続にバインドされている学生 ID を取得
    async fn resolve(&self, connection_id: &ConnectionId)
    -> Result<Option<StudentId>, SessionError>;

    /// 接続をクラスの観測者（教員ダッシュボード）として登録
    async fn watch(&self, connection_id: &ConnectionId, class_id: ClassId)
    -> Result<(), SessionError>;

    /// 指定した学生にバインドされた接続と、クラスの観測者の接続を取得（ルーム配信先）
    async fn connections_for(&self, student_ids: &[StudentId], class_id: &ClassId)
    -> Vec<ConnectionId>;

    /// 接続中の接続数
    async fn connection_count(&self) -> usize;
}

/// Presence Tracker trait
///
/// クラスごとの在室状況と、学生ごとの色シグナル・生存接続を管理する。
#[async_trait]
pub trait PresenceTracker: Send + Sync {
    /// 学生をクラスに登録する（他のクラスからは外れる）。色は初回のみ inactive で初期化
    async fn register(
        &self,
        class_id: ClassId,
        student_id: StudentId,
        connection_id: ConnectionId,
    ) -> Option<ClassId>;

    /// 学生の色シグナルを更新し、所属クラスを返す
    async fn set_color(
        &self,
        student_id: &StudentId,
        color: ColorSignal,
    ) -> Result<Option<ClassId>, PresenceError>;

    /// 接続を外す。最後の接続なら色を inactive に戻す（冪等）
    async fn disconnect(&self, student_id: &StudentId, connection_id: &ConnectionId);

    /// 生存接続を 1 つ以上持つメンバー数
    async fn active_count(&self, class_id: &ClassId) -> Result<usize, PresenceError>;

    /// アクティブなメンバーの色の割合
    async fn color_fractions(&self, class_id: &ClassId) -> Result<ColorFractions, PresenceError>;

    /// クラスに一度でも登録した学生数
    async fn total_count(&self, class_id: &ClassId) -> Result<usize, PresenceError>;

    /// 現在のメンバー
    async fn members(&self, class_id: &ClassId) -> Result<Vec<StudentId>, PresenceError>;

    /// 学生の現在の色
    async fn color_of(&self, student_id: &StudentId) -> Result<ColorSignal, PresenceError>;

    /// これまでに作成されたクラスの一覧
    async fn classes(&self) -> Vec<ClassId>;
}

/// Question Queue trait
///
/// クラスごとの追記専用の質問ログ。
#[async_trait]
pub trait QuestionQueue: Send + Sync {
    /// 質問を pending で追加し、インデックスを返す
    async fn submit(&self, class_id: &ClassId, text: QuestionText, submitted_at: Timestamp)
    -> usize;

    /// pending の質問を solved にする
    async fn mark_solved(&self, class_id: &ClassId, index: usize)
    -> Result<QuestionStatus, QuestionError> {
        self.resolve(class_id, index, Resolution::Solved).await
    }

    /// pending の質問を submitted にする
    async fn mark_submitted(
        &self,
        class_id: &ClassId,
        index: usize,
    ) -> Result<QuestionStatus, QuestionError> {
        self.resolve(class_id, index, Resolution::Submitted).await
    }

    /// pending の質問を終端状態へ遷移させる
    async fn resolve(
        &self,
        class_id: &ClassId,
        index: usize,
        resolution: Resolution,
    ) -> Result<QuestionStatus, QuestionError>;

    /// 回答を設定（ステータスは変えない）
    async fn set_answer(&self, class_id: &ClassId, index: usize, answer: String)
    -> Result<(), QuestionError>;

    /// 質問ログのスナップショット
    async fn questions(&self, class_id: &ClassId) -> Result<Vec<Question>, QuestionError>;

    /// 質問数
    async fn len(&self, class_id: &ClassId) -> usize;
}

/// Context Registry trait
///
/// クラスごとの回答コンテキスト（検索インデックス）を管理する。
#[async_trait]
pub trait ContextRegistry: Send + Sync {
    /// コンテキストを設定（既存のものは置き換える）
    async fn attach(&self, class_id: ClassId, context: AnswerContext);

    /// コンテキストを取得
    async fn get(&self, class_id: &ClassId) -> Option<AnswerContext>;
}
