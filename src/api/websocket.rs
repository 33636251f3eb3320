use crate::api::connection::GameConnection;
use crate::config::TrailConfig;
use crate::presentation::ChannelPresenter;
use crate::session::{GameSession, SessionRegistry};
use axum::{
    extract::{ws::WebSocket, Request, State, WebSocketUpgrade},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state for the game endpoints
#[derive(Clone)]
pub struct GameAppState {
    pub config: Arc<TrailConfig>,
    pub registry: Arc<SessionRegistry>,
}

impl GameAppState {
    pub fn new(config: TrailConfig) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(SessionRegistry::new()),
        }
    }
}

/// Refuses new game connections once `server.max_sessions` are live.
///
/// Runs BEFORE WebSocket upgrade extraction so 503 is returned without a
/// handshake.
async fn session_limit(State(state): State<Arc<GameAppState>>, req: Request, next: Next) -> Response {
    let live = state.registry.len();
    if live >= state.config.server.max_sessions {
        warn!(live, max = state.config.server.max_sessions, "Session limit reached");
        return (StatusCode::SERVICE_UNAVAILABLE, "Too many active games").into_response();
    }
    next.run(req).await
}

/// GET /api/ws - WebSocket upgrade handler, one game session per connection
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<GameAppState>>) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Create WebSocket router with the session limit applied
pub fn create_ws_router(state: Arc<GameAppState>) -> Router {
    Router::new()
        .route("/api/ws", get(ws_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_limit))
        .with_state(state)
}

async fn handle_socket(socket: WebSocket, state: Arc<GameAppState>) {
    let (presenter, events) = ChannelPresenter::channel();
    let (session, task) = GameSession::spawn(&state.config, presenter, Arc::clone(&state.registry));

    GameConnection::new(session).handle(socket, events).await;

    if let Err(e) = task.await {
        warn!(error = %e, "Session task did not finish cleanly");
    }
}
