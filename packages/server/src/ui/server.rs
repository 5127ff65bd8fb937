//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        attach_context, get_dashboard, get_stats, health_check, list_classes, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Classroom presence server
///
/// # Example
///
/// ```ignore
/// let state = AppState::in_memory(Arc::new(NullAnswerer), HashMap::new(), timeout);
/// Server::new(Arc::new(state)).run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Build the router with every endpoint mounted.
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/classes", get(list_classes))
            .route("/api/classes/{class_id}/dashboard", get(get_dashboard))
            .route("/api/classes/{class_id}/context", put(attach_context))
            .route("/api/stats", get(get_stats))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to `host:port` and serve until SIGINT / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Classroom server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?student_id=<id>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
