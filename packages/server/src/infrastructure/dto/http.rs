//! HTTP API response DTOs.

use serde::Serialize;

/// Summary of one room for the listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub participants: Vec<String>,
}

/// Detailed view of one room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
}

/// One participant entry in a room detail response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub socket_id: String,
    pub username: String,
    pub connected_at: String,
}
