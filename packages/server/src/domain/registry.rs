//! Session registry trait definition.
//!
//! The registry tracks which connection belongs to which room under which
//! display name. Room membership is derived from these records: a room
//! "exists" exactly while at least one participant maps to it. The use case
//! layer depends on this trait; the infrastructure layer provides the
//! concrete in-memory implementation (dependency inversion).

use async_trait::async_trait;

use super::entity::Participant;
use super::value_object::{ClientId, RoomId};

#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Record a membership. Idempotent per connection: a second join from
    /// the same connection overwrites the previous record, so later lookups
    /// always observe the latest room and display name.
    async fn join(&self, participant: Participant);

    /// Look up one connection's membership record.
    async fn find(&self, client_id: &ClientId) -> Option<Participant>;

    /// Enumerate the participants of a room, sorted by connection id.
    /// The order carries no meaning; sorting just keeps it deterministic.
    async fn members(&self, room_id: &RoomId) -> Vec<Participant>;

    /// Delete a membership record, returning it so the caller can notify
    /// the former room. Removing an unknown connection is a no-op.
    async fn remove(&self, client_id: &ClientId) -> Option<Participant>;

    /// Distinct room keys that currently have at least one participant.
    async fn rooms(&self) -> Vec<RoomId>;
}
