//! Domain entities.

use super::value_object::{ClientId, RoomId, Timestamp, Username};

/// One connection's membership record within a room.
///
/// A connection holds at most one membership at a time; a second join from
/// the same connection overwrites the previous record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Connection identifier (the wire-level socket id)
    pub id: ClientId,
    /// Display name the participant joined under
    pub username: Username,
    /// Room the participant currently belongs to
    pub room_id: RoomId,
    /// When the membership was recorded (Unix milliseconds)
    pub connected_at: Timestamp,
}

impl Participant {
    pub fn new(id: ClientId, username: Username, room_id: RoomId, connected_at: Timestamp) -> Self {
        Self {
            id,
            username,
            room_id,
            connected_at,
        }
    }
}
