//! Router assembly and server runner.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router on top of the given state
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_name}", get(get_room_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until a shutdown signal arrives
pub async fn run_server(host: &str, port: u16) -> std::io::Result<()> {
    let state = Arc::new(AppState::new());
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
