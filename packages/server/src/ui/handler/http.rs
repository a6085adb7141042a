//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::infrastructure::dto::http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto};
use crate::ui::state::AppState;
use dojo_shared::time::unix_millis_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|(room_id, members)| RoomSummaryDto {
            id: room_id.into_string(),
            participants: members
                .iter()
                .map(|p| p.username.as_str().to_string())
                .collect(),
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id.clone()).await {
        Ok(members) => {
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                id: room_id,
                participants: members
                    .iter()
                    .map(|p| ParticipantDetailDto {
                        socket_id: p.id.as_str().to_string(),
                        username: p.username.as_str().to_string(),
                        connected_at: unix_millis_to_rfc3339(p.connected_at.value()),
                    })
                    .collect(),
            };
            Ok(Json(room_detail))
        }
        Err(crate::usecase::GetRoomDetailError::RoomNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(crate::usecase::GetRoomDetailError::InvalidRoomId) => Err(StatusCode::BAD_REQUEST),
    }
}
