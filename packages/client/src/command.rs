//! Input line parsing.

use fastcups_server::infrastructure::dto::websocket::ClientEvent;

pub const USAGE: &str = "Commands: /color <green|yellow|red|inactive>, /ask <question>, \
/solve <n>, /submit <n>, /quit. Plain text asks a question.";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Color(String),
    Ask(String),
    Solve(i64),
    Submit(i64),
    Quit,
}

impl Command {
    /// Parse a trimmed, non-empty input line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Ask(line.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "color" if !arg.is_empty() => Ok(Command::Color(arg.to_lowercase())),
            "ask" if !arg.is_empty() => Ok(Command::Ask(arg.to_string())),
            "solve" => parse_index(arg).map(Command::Solve),
            "submit" => parse_index(arg).map(Command::Submit),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(format!("Unknown command '{}'. {}", line, USAGE)),
        }
    }

    /// Wire event for this command in `class_id`. `Quit` has none.
    pub fn into_event(self, class_id: &str) -> Option<ClientEvent> {
        let class_id = class_id.to_string();
        match self {
            Command::Color(color) => Some(ClientEvent::SetColor { color }),
            Command::Ask(question) => Some(ClientEvent::SubmitQuestion { class_id, question }),
            Command::Solve(index) => Some(ClientEvent::MarkSolved { class_id, index }),
            Command::Submit(index) => Some(ClientEvent::MarkSubmitted { class_id, index }),
            Command::Quit => None,
        }
    }
}

fn parse_index(arg: &str) -> Result<i64, String> {
    arg.parse::<i64>()
        .map_err(|_| format!("Expected a question number, got '{}'", arg))
}
