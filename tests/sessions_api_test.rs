// Integration tests for GET /api/sessions, /api/sessions/:id and /api/config

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use colortrail::api::{create_sessions_router, GameAppState};
use colortrail::config::TrailConfig;
use colortrail::presentation::LogPresenter;
use colortrail::session::{GameSession, SessionHandle};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn create_test_app(state: &Arc<GameAppState>) -> Router {
    create_sessions_router(Arc::clone(state))
}

fn spawn_session(state: &Arc<GameAppState>) -> SessionHandle {
    let (handle, _task) = GameSession::spawn(
        &state.config,
        LogPresenter::new("test"),
        Arc::clone(&state.registry),
    );
    handle
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_list_sessions_empty() {
    let state = Arc::new(GameAppState::new(TrailConfig::default()));

    let (status, body) = get_json(create_test_app(&state), "/api/sessions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_sessions_shows_live_sessions() {
    let state = Arc::new(GameAppState::new(TrailConfig::default()));
    let first = spawn_session(&state);
    let second = spawn_session(&state);

    let (status, body) = get_json(create_test_app(&state), "/api/sessions").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["session_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.id().to_string()));
    assert!(ids.contains(&second.id().to_string()));
}

#[tokio::test]
async fn test_get_idle_session() {
    let state = Arc::new(GameAppState::new(TrailConfig::default()));
    let session = spawn_session(&state);

    let uri = format!("/api/sessions/{}", session.id());
    let (status, body) = get_json(create_test_app(&state), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "idle");
    assert_eq!(body["level"], 1);
    assert_eq!(body["score"], 0);
    assert_eq!(body["sequence_len"], 0);
}

#[tokio::test]
async fn test_get_started_session_reports_phase() {
    let state = Arc::new(GameAppState::new(TrailConfig::default()));
    let session = spawn_session(&state);
    session.start().unwrap();
    // Answered after Start has been applied and recorded
    session.summary().await.unwrap();

    let uri = format!("/api/sessions/{}", session.id());
    let (status, body) = get_json(create_test_app(&state), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "showing_sequence");
    assert_eq!(body["level"], 1);
}

#[tokio::test]
async fn test_get_unknown_session_returns_404() {
    let state = Arc::new(GameAppState::new(TrailConfig::default()));

    let uri = format!("/api/sessions/{}", Uuid::new_v4());
    let (status, body) = get_json(create_test_app(&state), &uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_get_session_with_invalid_id_is_rejected() {
    let state = Arc::new(GameAppState::new(TrailConfig::default()));

    let (status, _) = get_json(create_test_app(&state), "/api/sessions/not-a-uuid").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ended_session_disappears() {
    let state = Arc::new(GameAppState::new(TrailConfig::default()));
    let (handle, task) = GameSession::spawn(
        &state.config,
        LogPresenter::new("test"),
        Arc::clone(&state.registry),
    );
    let id = handle.id();
    drop(handle);
    task.await.unwrap();

    let uri = format!("/api/sessions/{}", id);
    let (status, _) = get_json(create_test_app(&state), &uri).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.registry.is_empty());
}

#[tokio::test]
async fn test_get_config_returns_effective_values() {
    let mut config = TrailConfig::default();
    config.game.base_speed_ms = 800;
    config.timing.next_round_delay_ms = 2000;
    let state = Arc::new(GameAppState::new(config));

    let (status, body) = get_json(create_test_app(&state), "/api/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game"]["base_speed_ms"], 800);
    assert_eq!(body["game"]["speed_step_ms"], 50);
    assert_eq!(body["game"]["min_speed_ms"], 100);
    assert_eq!(body["game"]["points_per_level"], 10);
    assert_eq!(body["timing"]["next_round_delay_ms"], 2000);
    assert_eq!(body["timing"]["start_delay_ms"], 500);
    // Server section is not exposed
    assert!(body.get("server").is_none());
}
