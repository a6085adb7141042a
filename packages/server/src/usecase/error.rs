//! UseCase-level error types.

use thiserror::Error;

/// Failure of the leave/disconnect use case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeaveError {
    /// The connection never joined a room (or already left)
    #[error("connection '{0}' holds no room membership")]
    NotJoined(String),
}

/// Failure of the room detail lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GetRoomDetailError {
    #[error("room id is not valid")]
    InvalidRoomId,
    /// Rooms are derived from membership, so an empty room and an unknown
    /// room are the same thing
    #[error("room '{0}' has no participants")]
    RoomNotFound(String),
}
