use anyhow::{Context, Result};
use colortrail::api::{create_router, GameAppState};
use colortrail::config::{apply_env_overrides, load_config, TrailConfig};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colortrail=info".into()),
        )
        .init();

    info!("Colortrail starting...");

    // Config file is optional; defaults match the classic game
    let mut config = match std::env::var("COLORTRAIL_CONFIG") {
        Ok(path) => load_config(&path)?,
        Err(_) => TrailConfig::default(),
    };
    apply_env_overrides(&mut config);
    config
        .validate()
        .context("Invalid configuration after environment overrides")?;

    info!(
        bind_addr = %config.server.bind_addr,
        max_sessions = config.server.max_sessions,
        base_speed_ms = config.game.base_speed_ms,
        min_speed_ms = config.game.min_speed_ms,
        "Configuration loaded"
    );

    let bind_addr = config.server.bind_addr.clone();
    let state = Arc::new(GameAppState::new(config));
    let router = create_router(Arc::clone(&state)).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!(addr = %bind_addr, "Game server listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Game server error");
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!(live_sessions = state.registry.len(), "Shutdown signal received");

    server_handle.abort();
    info!("Colortrail stopped");

    Ok(())
}
