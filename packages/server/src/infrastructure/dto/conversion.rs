//! Conversion logic between DTOs and domain entities.

use fastcups_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{ColorFractions, Dashboard, GlobalEvent, Question, RoomEvent};
use crate::infrastructure::dto::{http, websocket};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<GlobalEvent> for websocket::ServerEvent {
    fn from(event: GlobalEvent) -> Self {
        match event {
            GlobalEvent::DeactivateOldTab {
                student_id,
                timestamp,
            } => Self::DeactivateOldTab {
                student_id: student_id.into_string(),
                timestamp: timestamp.value(),
            },
        }
    }
}

impl From<RoomEvent> for websocket::ServerEvent {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::NewQuestion {
                index,
                question,
                answer,
            } => Self::NewQuestion {
                index,
                question: question.into_string(),
                answer,
            },
            RoomEvent::QuestionStatusUpdate { index, status } => Self::QuestionStatusUpdate {
                index,
                status: status.as_str().to_string(),
            },
            RoomEvent::QuestionAnswered { index, answer } => {
                Self::QuestionAnswered { index, answer }
            }
        }
    }
}

impl From<ColorFractions> for http::ColorFractionsDto {
    fn from(model: ColorFractions) -> Self {
        Self {
            green: model.green,
            yellow: model.yellow,
            red: model.red,
        }
    }
}

impl From<(usize, Question)> for http::QuestionDto {
    fn from((index, model): (usize, Question)) -> Self {
        Self {
            index,
            question: model.text.into_string(),
            answer: model.answer,
            status: model.status.as_str().to_string(),
            submitted_at: timestamp_to_jst_rfc3339(model.submitted_at.value()),
        }
    }
}

impl From<Dashboard> for http::DashboardResponse {
    fn from(model: Dashboard) -> Self {
        Self {
            class_id: model.class_id.into_string(),
            student_count: model.student_count,
            active_student_count: model.active_student_count,
            color_fractions: model.color_fractions.into(),
            questions: model
                .questions
                .into_iter()
                .enumerate()
                .map(http::QuestionDto::from)
                .collect(),
        }
    }
}
