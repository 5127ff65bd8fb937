//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{Stream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::{mpsc, watch};

use crate::{
    domain::{ConnectionId, ErrorKind, Resolution, StudentId},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Student identity; omitted by teacher dashboards.
    pub student_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let student_id = match query.student_id {
        None => None,
        Some(raw) => match StudentId::try_from(raw.clone()) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Invalid student_id '{}': {}", raw, e);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, student_id)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Read frames and dispatch them until the client leaves or `shutdown` is raised.
///
/// `shutdown` is only checked between frames, so a dispatch in progress always runs to
/// completion.
async fn recv_loop<S>(
    mut receiver: S,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    student_id: Option<StudentId>,
    mut shutdown: watch::Receiver<bool>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let msg = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            msg = receiver.next() => msg,
        };
        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!(connection_id = %connection_id, "WebSocket error: {}", e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!(connection_id = %connection_id, "Received text: {}", text);
                dispatch(&state, &connection_id, student_id.as_ref(), &text).await;
            }
            Message::Close(_) => {
                tracing::debug!(connection_id = %connection_id, "Client requested close");
                break;
            }
            _ => {}
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, student_id: Option<StudentId>) {
    let (sender, receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Registering the channel first lets this tab see its own deactivate-old-tab.
    let connection_id = state.open_connection_usecase.execute(tx.clone()).await;
    tracing::info!(
        connection_id = %connection_id,
        student_id = student_id.as_ref().map(StudentId::as_str).unwrap_or("-"),
        "Connection opened"
    );

    match (ServerEvent::Connected {
        connection_id: connection_id.to_string(),
    })
    .to_json()
    {
        Ok(payload) => {
            let _ = tx.send(payload);
        }
        Err(e) => tracing::error!("Failed to serialize connected event: {}", e),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = tokio::spawn(recv_loop(
        receiver,
        state.clone(),
        connection_id,
        student_id,
        shutdown_rx,
    ));

    // The reader is never aborted: it is asked to stop and finishes its current frame.
    let recv_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    let _ = shutdown_tx.send(true);
    if !recv_finished && let Err(e) = recv_task.await {
        tracing::error!(connection_id = %connection_id, "Receive task failed: {}", e);
    }
    send_task.abort();

    state.close_connection_usecase.execute(&connection_id).await;
}

/// Parse one inbound frame and run the matching use case.
///
/// Failures never reach the client: the event is dropped, logged and counted.
async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    student_id: Option<&StudentId>,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            drop_event(
                state,
                connection_id,
                "malformed",
                ErrorKind::InvalidArgument,
                &e.to_string(),
            );
            return;
        }
    };
    let name = event.name();

    let result = match event {
        ClientEvent::Register {
            class_id,
            timestamp,
        } => state
            .register_student_usecase
            .execute(connection_id, student_id.cloned(), class_id, timestamp)
            .await
            .map(|_| ())
            .map_err(|e| (e.kind(), e.to_string())),
        ClientEvent::SetColor { color } => state
            .change_color_usecase
            .execute(connection_id, &color)
            .await
            .map(|_| ())
            .map_err(|e| (e.kind(), e.to_string())),
        ClientEvent::SubmitQuestion { class_id, question } => state
            .submit_question_usecase
            .execute(class_id, question)
            .await
            .map(|_| ())
            .map_err(|e| (e.kind(), e.to_string())),
        ClientEvent::MarkSolved { class_id, index } => state
            .update_question_status_usecase
            .execute(class_id, index, Resolution::Solved)
            .await
            .map(|_| ())
            .map_err(|e| (e.kind(), e.to_string())),
        ClientEvent::MarkSubmitted { class_id, index } => state
            .update_question_status_usecase
            .execute(class_id, index, Resolution::Submitted)
            .await
            .map(|_| ())
            .map_err(|e| (e.kind(), e.to_string())),
        ClientEvent::Watch { class_id } => state
            .watch_class_usecase
            .execute(connection_id, class_id)
            .await
            .map(|_| ())
            .map_err(|e| (e.kind(), e.to_string())),
    };

    if let Err((kind, reason)) = result {
        drop_event(state, connection_id, name, kind, &reason);
    }
}

fn drop_event(
    state: &AppState,
    connection_id: &ConnectionId,
    event: &str,
    kind: ErrorKind,
    reason: &str,
) {
    state.counters.record(kind);
    tracing::warn!(
        connection_id = %connection_id,
        event,
        kind = %kind,
        reason,
        "Dropped event"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, time::Duration};

    use futures_util::stream;

    use crate::infrastructure::answerer::NullAnswerer;

    fn create_state() -> Arc<AppState> {
        Arc::new(AppState::in_memory(
            Arc::new(NullAnswerer),
            HashMap::new(),
            Duration::from_secs(1),
        ))
    }

    #[tokio::test]
    async fn test_shutdown_during_dispatch_completes_registration() {
        // テスト項目: フレーム処理中に停止が要求されても、登録は最後まで実行される
        // given (前提条件): register フレームを渡した瞬間に停止を要求するストリーム
        let state = create_state();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = state.open_connection_usecase.execute(tx).await;
        let alice = StudentId::new("alice".to_string()).unwrap();
        let register = ClientEvent::Register {
            class_id: "cs50".to_string(),
            timestamp: 200.0,
        }
        .to_json()
        .unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let frames = stream::iter(vec![Ok::<_, axum::Error>(Message::Text(register.into()))])
            .inspect(move |_| {
                let _ = shutdown_tx.send(true);
            })
            .chain(stream::pending());

        // when (操作):
        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            recv_loop(frames, state.clone(), conn, Some(alice.clone()), shutdown_rx),
        )
        .await;

        // then (期待する結果): ループは終了し、バインドと deactivate-old-tab の配信が済んでいる
        assert!(finished.is_ok());
        assert_eq!(state.sessions.resolve(&conn).await, Ok(Some(alice)));
        let frame: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(frame["type"], "deactivate-old-tab");
        assert_eq!(frame["timestamp"], 200.0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_idle_reader() {
        // テスト項目: フレームを待っている間に停止が要求されると、ループは終了する
        // given (前提条件):
        let state = create_state();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = state.open_connection_usecase.execute(tx).await;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let frames = stream::pending::<Result<Message, axum::Error>>();
        let reader = tokio::spawn(recv_loop(frames, state.clone(), conn, None, shutdown_rx));

        // when (操作):
        shutdown_tx.send(true).unwrap();

        // then (期待する結果):
        assert!(tokio::time::timeout(Duration::from_secs(2), reader).await.is_ok());
    }
}
