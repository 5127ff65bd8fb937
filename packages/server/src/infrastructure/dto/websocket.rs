//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame tagged by `type` in kebab-case.

use serde::{Deserialize, Serialize};

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Bind the connection to its student id and join a class.
    Register { class_id: String, timestamp: f64 },
    SetColor { color: String },
    SubmitQuestion { class_id: String, question: String },
    /// Negative indices are accepted on the wire and dropped as out of range.
    MarkSolved { class_id: String, index: i64 },
    MarkSubmitted { class_id: String, index: i64 },
    /// Subscribe a teacher dashboard to the class's room events.
    Watch { class_id: String },
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Register { .. } => "register",
            ClientEvent::SetColor { .. } => "set-color",
            ClientEvent::SubmitQuestion { .. } => "submit-question",
            ClientEvent::MarkSolved { .. } => "mark-solved",
            ClientEvent::MarkSubmitted { .. } => "mark-submitted",
            ClientEvent::Watch { .. } => "watch",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    Connected {
        connection_id: String,
    },
    DeactivateOldTab {
        student_id: String,
        timestamp: f64,
    },
    NewQuestion {
        index: usize,
        question: String,
        answer: Option<String>,
    },
    QuestionStatusUpdate {
        index: usize,
        status: String,
    },
    QuestionAnswered {
        index: usize,
        answer: String,
    },
}

impl ServerEvent {
    /// Serialize into a text frame payload.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_register_from_json() {
        // テスト項目: register イベントが JSON から復元できる
        // given (前提条件):
        let json = r#"{"type":"register","class_id":"cs50","timestamp":100}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Register {
                class_id: "cs50".to_string(),
                timestamp: 100.0
            }
        );
    }

    #[test]
    fn test_client_event_kebab_case_tags() {
        // テスト項目: 複数語のイベント名は kebab-case で表現される
        let json = r#"{"type":"mark-solved","class_id":"algo101","index":1}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            ClientEvent::MarkSolved {
                class_id: "algo101".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn test_client_event_unknown_type_is_rejected() {
        let json = r#"{"type":"dance","class_id":"cs50"}"#;
        assert!(serde_json::from_str::<ClientEvent>(json).is_err());
    }

    #[test]
    fn test_server_event_new_question_keeps_null_answer() {
        // テスト項目: 回答が未設定の new-question は answer: null を含む
        // given (前提条件):
        let event = ServerEvent::NewQuestion {
            index: 0,
            question: "what is a heap?".to_string(),
            answer: None,
        };

        // when (操作):
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "new-question");
        assert_eq!(json["index"], 0);
        assert!(json["answer"].is_null());
    }

    #[test]
    fn test_server_event_deactivate_old_tab_shape() {
        let event = ServerEvent::DeactivateOldTab {
            student_id: "alice".to_string(),
            timestamp: 200.0,
        };
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "deactivate-old-tab");
        assert_eq!(json["student_id"], "alice");
        assert_eq!(json["timestamp"], 200.0);
    }
}
