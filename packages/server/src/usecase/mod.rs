//! UseCase 層
//!
//! 受信イベントごとに 1 つのユースケースを定義し、ドメインの trait だけに依存して
//! 状態の更新と配信を組み立てます。

pub mod attach_context;
pub mod change_color;
pub mod close_connection;
pub mod error;
pub mod fanout;
pub mod get_dashboard;
pub mod list_classes;
pub mod open_connection;
pub mod register_student;
pub mod submit_question;
pub mod update_question_status;
pub mod watch_class;

#[cfg(test)]
pub(crate) mod test_support;

pub use attach_context::AttachContextUseCase;
pub use change_color::ChangeColorUseCase;
pub use close_connection::CloseConnectionUseCase;
pub use error::{
    AttachContextError, ChangeColorError, DashboardError, RegisterError, SubmitQuestionError,
    UpdateQuestionStatusError, WatchClassError,
};
pub use fanout::RoomFanout;
pub use get_dashboard::GetDashboardUseCase;
pub use list_classes::ListClassesUseCase;
pub use open_connection::OpenConnectionUseCase;
pub use register_student::{RegisterStudentUseCase, Registration};
pub use submit_question::{SubmitQuestionUseCase, SubmittedQuestion, DEFAULT_ANSWER_TIMEOUT};
pub use update_question_status::UpdateQuestionStatusUseCase;
pub use watch_class::WatchClassUseCase;
