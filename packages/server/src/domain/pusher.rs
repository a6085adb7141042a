//! Event pusher trait definition.
//!
//! Abstracts outbound event delivery to connected clients. The concrete
//! WebSocket implementation lives in the infrastructure layer.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::EventPushError;
use super::value_object::ClientId;

/// Channel used to hand serialized events to a connection's writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait EventPusher: Send + Sync {
    /// Register a connection's sender channel.
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// Unregister a connection's sender channel.
    async fn unregister_client(&self, client_id: &ClientId);

    /// Deliver an event to a single connection.
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), EventPushError>;

    /// Deliver an event to each target, at most once per currently-connected
    /// recipient. A target that is missing or already closed is skipped;
    /// partial delivery is not an error.
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), EventPushError>;
}
