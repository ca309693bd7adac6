//! HTTP API endpoint handlers.
//!
//! Read-only observation endpoints; all mutation happens over WebSocket.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomName,
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let snapshots = state.repository.room_snapshots().await;
    Json(snapshots.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let name = RoomName::new(room_name).map_err(|_| StatusCode::BAD_REQUEST)?;
    let snapshot = state
        .repository
        .room_snapshot(&name)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(RoomDetailDto::from(&snapshot)))
}
