//! HTTP API endpoint handlers.
//!
//! Pull queries are recomputed from the stores on every request.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::ErrorKind,
    infrastructure::dto::http::{
        AttachContextRequest, AttachContextResponse, ClassListResponse, DashboardResponse,
        ErrorResponse, HealthResponse, StatsResponse,
    },
    ui::state::AppState,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(kind: ErrorKind, message: String) -> ApiError {
    let status = match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            kind: kind.as_str().to_string(),
            message,
        }),
    )
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        connections: state.sessions.connection_count().await,
    })
}

/// Get list of classes seen so far
pub async fn list_classes(State(state): State<Arc<AppState>>) -> Json<ClassListResponse> {
    let classes = state.list_classes_usecase.execute().await;
    Json(ClassListResponse {
        classes: classes.into_iter().map(|c| c.into_string()).collect(),
    })
}

/// Get the teacher dashboard of one class
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<String>,
) -> Result<Json<DashboardResponse>, ApiError> {
    state
        .get_dashboard_usecase
        .execute(class_id)
        .await
        .map(|dashboard| Json(dashboard.into()))
        .map_err(|e| api_error(e.kind(), e.to_string()))
}

/// Attach an answer context (search index) to a class
pub async fn attach_context(
    State(state): State<Arc<AppState>>,
    Path(class_id): Path<String>,
    Json(request): Json<AttachContextRequest>,
) -> Result<Json<AttachContextResponse>, ApiError> {
    let (class_id, context) = state
        .attach_context_usecase
        .execute(class_id, request.index)
        .await
        .map_err(|e| api_error(e.kind(), e.to_string()))?;

    Ok(Json(AttachContextResponse {
        class_id: class_id.into_string(),
        index: context.index,
    }))
}

/// Dropped-event counters
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        dropped_events: state.counters.snapshot(),
    })
}
