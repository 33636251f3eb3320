// HTTP and WebSocket APIs

mod connection;
pub mod protocol;
pub mod sessions;
pub mod websocket;

pub use connection::GameConnection;
pub use sessions::create_sessions_router;
pub use websocket::{create_ws_router, ws_handler, GameAppState};

use axum::Router;
use std::sync::Arc;

/// Every route of the game server
pub fn create_router(state: Arc<GameAppState>) -> Router {
    create_ws_router(Arc::clone(&state)).merge(create_sessions_router(state))
}
