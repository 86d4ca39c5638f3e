//! Plain HTTP endpoints: health, room creation, room status.
//!
//! Thin by design — each handler is one registry call plus a JSON shape.
//! The status endpoint always answers 200 with `{"status": ...}`; the
//! "not found" case is a payload value, not a transport error, so the
//! collaborator contract stays a single shape.

use axum::extract::{Path, State};
use axum::Json;
use roshambo_protocol::RoomId;
use serde_json::{json, Value};

use crate::AppState;

/// `GET /` — liveness probe for the hosting platform.
pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /create_room` — mints a fresh room id with empty state.
pub(crate) async fn create_room(State(state): State<AppState>) -> Json<Value> {
    let room_id = state.registry.create_room().await;
    Json(json!({ "room_id": room_id }))
}

/// `GET /rooms/{room_id}/status` — reports `not_found`, `available`, or
/// `full`, derived from the current member count.
pub(crate) async fn room_status(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Json<Value> {
    let status = state.registry.status(&RoomId(room_id)).await;
    Json(json!({ "status": status }))
}
