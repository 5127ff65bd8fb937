//! Message formatting utilities for client display.

use fastcups_shared::time::timestamp_to_jst_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Banner shown once the session is registered (or watching).
    pub fn format_session_started(who: &str, class_id: &str, watching: bool) -> String {
        let role = if watching { "watching" } else { "joined" };
        format!(
            "\n============================================================\n\
             {} {} class '{}'\n\
             ============================================================\n",
            who, role, class_id
        )
    }

    pub fn format_new_question(index: usize, question: &str, answer: Option<&str>) -> String {
        let mut output = format!("\n? [#{}] {}\n", index, question);
        if let Some(answer) = answer {
            output.push_str(&format!("  -> {}\n", answer));
        }
        output
    }

    pub fn format_question_answered(index: usize, answer: &str) -> String {
        format!("\n! [#{}] answered: {}\n", index, answer)
    }

    pub fn format_status_update(index: usize, status: &str) -> String {
        format!("\n* [#{}] marked {}\n", index, status)
    }

    pub fn format_deactivated(registered_at: f64) -> String {
        format!(
            "\nThis tab was replaced by a newer one (registered at {}). Exiting.\n",
            timestamp_to_jst_rfc3339(registered_at as i64)
        )
    }

    /// Format the sent confirmation
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        format!("(sent at {})\n", timestamp_to_jst_rfc3339(sent_at))
    }

    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_new_question_without_answer() {
        // テスト項目: 回答のない新着質問は質問行のみ表示される
        // given (前提条件):
        let question = "What is a pointer?";

        // when (操作):
        let result = MessageFormatter::format_new_question(0, question, None);

        // then (期待する結果):
        assert_eq!(result, "\n? [#0] What is a pointer?\n");
    }

    #[test]
    fn test_format_new_question_with_answer() {
        // テスト項目: 回答付きの新着質問は回答行も表示される
        let result = MessageFormatter::format_new_question(2, "Why?", Some("Because."));

        assert_eq!(result, "\n? [#2] Why?\n  -> Because.\n");
    }

    #[test]
    fn test_format_status_update() {
        // テスト項目: 状態更新が番号と状態で表示される
        let result = MessageFormatter::format_status_update(1, "solved");

        assert_eq!(result, "\n* [#1] marked solved\n");
    }

    #[test]
    fn test_format_deactivated() {
        // テスト項目: 非アクティブ化メッセージに登録時刻（JST）が含まれる
        // given (前提条件):
        let timestamp = 1672498800000.0; // 2023-01-01 00:00:00 JST

        // when (操作):
        let result = MessageFormatter::format_deactivated(timestamp);

        // then (期待する結果):
        assert!(result.contains("2023-01-01T00:00:00"));
        assert!(result.contains("newer"));
    }

    #[test]
    fn test_format_session_started() {
        // テスト項目: 開始メッセージに参加者名とクラス名が含まれる
        let result = MessageFormatter::format_session_started("alice", "cs50", false);

        assert!(result.contains("alice joined class 'cs50'"));
    }
}
