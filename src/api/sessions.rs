use crate::api::websocket::GameAppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn create_sessions_router(state: Arc<GameAppState>) -> Router {
    Router::new()
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/config", get(get_config))
        .with_state(state)
}

/// GET /api/sessions - live sessions, oldest first
async fn list_sessions(State(state): State<Arc<GameAppState>>) -> Response {
    Json(state.registry.list()).into_response()
}

/// GET /api/sessions/:id
async fn get_session(State(state): State<Arc<GameAppState>>, Path(id): Path<Uuid>) -> Response {
    match state.registry.get(&id) {
        Some(summary) => Json(summary).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("session {} not found", id),
            }),
        )
            .into_response(),
    }
}

/// GET /api/config - effective game tuning and timing
async fn get_config(State(state): State<Arc<GameAppState>>) -> Response {
    Json(json!({
        "game": state.config.game,
        "timing": state.config.timing,
    }))
    .into_response()
}
