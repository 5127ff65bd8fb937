//! WebSocket client session management.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use url::Url;

use fastcups_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};
use fastcups_shared::time::get_jst_timestamp;

use super::{
    command::{Command, USAGE},
    domain::should_deactivate,
    error::ClientError,
    formatter::MessageFormatter,
    runner::{ClientMode, ClientOptions},
    ui::redisplay_prompt,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Run one connection until the user quits, the tab is replaced, or the connection drops.
pub async fn run_client_session(
    options: &ClientOptions,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let url = session_url(options)?;

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(e) => {
            let error_msg = e.to_string();
            if error_msg.contains("400") || error_msg.contains("Bad Request") {
                return Err(ClientError::Rejected(error_msg));
            }
            return Err(ClientError::ConnectionError(error_msg));
        }
    };
    tracing::info!("Connected to classroom server!");

    let (mut write, read) = ws_stream.split();

    // Each session registers as a fresh tab
    let registered_at = get_jst_timestamp() as f64;
    let opening = match &options.mode {
        ClientMode::Student { .. } => ClientEvent::Register {
            class_id: options.class_id.clone(),
            timestamp: registered_at,
        },
        ClientMode::Watch => ClientEvent::Watch {
            class_id: options.class_id.clone(),
        },
    };
    send_event(&mut write, &opening).await?;

    print!(
        "{}",
        MessageFormatter::format_session_started(
            options.who(),
            &options.class_id,
            matches!(options.mode, ClientMode::Watch),
        )
    );
    println!("{}\n", USAGE);

    let own_student = match &options.mode {
        ClientMode::Student { student_id } => Some(student_id.clone()),
        ClientMode::Watch => None,
    };
    let mut read_task = tokio::spawn(read_loop(read, own_student, registered_at, options.prompt()));

    tokio::select! {
        read_result = &mut read_task => {
            read_result.unwrap_or_else(|e| Err(ClientError::ConnectionLost(e.to_string())))
        }
        write_result = write_loop(&mut write, input_rx, options) => {
            read_task.abort();
            write_result
        }
    }
}

/// Endpoint URL with the student id percent-encoded into the query string.
pub(crate) fn session_url(options: &ClientOptions) -> Result<String, ClientError> {
    let mut url = Url::parse(&options.url)
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", options.url, e)))?;
    if let ClientMode::Student { student_id } = &options.mode {
        url.query_pairs_mut().append_pair("student_id", student_id);
    }
    Ok(url.into())
}

async fn send_event(
    write: &mut SplitSink<WsStream, Message>,
    event: &ClientEvent,
) -> Result<(), ClientError> {
    let json = event
        .to_json()
        .map_err(|e| ClientError::ConnectionLost(format!("Failed to serialize event: {}", e)))?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionLost(e.to_string()))
}

/// Print server events until the connection ends or this tab is replaced.
async fn read_loop(
    mut read: SplitStream<WsStream>,
    own_student: Option<String>,
    registered_at: f64,
    prompt: String,
) -> Result<(), ClientError> {
    while let Some(message) = read.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                break;
            }
            _ => continue,
        };

        let formatted = match serde_json::from_str::<ServerEvent>(&text) {
            Ok(ServerEvent::Connected { connection_id }) => {
                tracing::debug!("Connection id: {}", connection_id);
                continue;
            }
            Ok(ServerEvent::DeactivateOldTab {
                student_id,
                timestamp,
            }) => {
                if own_student.as_deref() == Some(student_id.as_str())
                    && should_deactivate(registered_at, timestamp)
                {
                    print!("{}", MessageFormatter::format_deactivated(timestamp));
                    return Err(ClientError::Deactivated {
                        student_id,
                        timestamp,
                    });
                }
                continue;
            }
            Ok(ServerEvent::NewQuestion {
                index,
                question,
                answer,
            }) => MessageFormatter::format_new_question(index, &question, answer.as_deref()),
            Ok(ServerEvent::QuestionStatusUpdate { index, status }) => {
                MessageFormatter::format_status_update(index, &status)
            }
            Ok(ServerEvent::QuestionAnswered { index, answer }) => {
                MessageFormatter::format_question_answered(index, &answer)
            }
            Err(_) => MessageFormatter::format_raw_message(&text),
        };
        print!("{}", formatted);
        redisplay_prompt(&prompt);
    }

    Err(ClientError::ConnectionLost("Server closed the session".to_string()))
}

/// Turn input lines into client events. Returns `Ok` when the user quits.
async fn write_loop(
    write: &mut SplitSink<WsStream, Message>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    options: &ClientOptions,
) -> Result<(), ClientError> {
    let prompt = options.prompt();

    while let Some(line) = input_rx.recv().await {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                redisplay_prompt(&prompt);
                continue;
            }
        };
        if matches!(options.mode, ClientMode::Watch) && matches!(command, Command::Color(_)) {
            println!("Watching clients have no color to report.");
            redisplay_prompt(&prompt);
            continue;
        }

        let Some(event) = command.into_event(&options.class_id) else {
            return Ok(());
        };
        send_event(write, &event).await?;

        print!("{}", MessageFormatter::format_sent_confirmation(get_jst_timestamp()));
        redisplay_prompt(&prompt);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(url: &str, mode: ClientMode) -> ClientOptions {
        ClientOptions {
            url: url.to_string(),
            class_id: "cs50".to_string(),
            mode,
        }
    }

    #[test]
    fn test_session_url_encodes_student_id() {
        // テスト項目: 学生 ID の予約文字と非 ASCII 文字がクエリ文字列でエンコードされる
        // given (前提条件):
        let options = options(
            "ws://127.0.0.1:8080/ws",
            ClientMode::Student {
                student_id: "a&b #c/é".to_string(),
            },
        );

        // when (操作):
        let url = session_url(&options).unwrap();

        // then (期待する結果):
        assert_eq!(url, "ws://127.0.0.1:8080/ws?student_id=a%26b+%23c%2F%C3%A9");
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("student_id".to_string(), "a&b #c/é".to_string())]);
    }

    #[test]
    fn test_session_url_for_watcher_has_no_query() {
        // テスト項目: 監視モードではクエリ文字列を付けない
        let url = session_url(&options("ws://127.0.0.1:8080/ws", ClientMode::Watch)).unwrap();

        assert_eq!(url, "ws://127.0.0.1:8080/ws");
    }

    #[test]
    fn test_session_url_rejects_unparsable_url() {
        // テスト項目: 解釈できない URL は InvalidUrl になる
        let result = session_url(&options("not a url", ClientMode::Watch));

        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }
}
