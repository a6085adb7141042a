//! WebSocket event DTOs.
//!
//! Every frame is a flat JSON object whose `type` field names the event.
//! Inbound frames deserialize into `InboundEvent`; a frame whose tag or
//! field set does not match any variant is rejected at parse time instead
//! of being accessed duck-typed.
//!
//! One wire note: the execution result payload carries its outcome
//! classification under `resultKind`, because `type` on a flat frame is
//! already taken by the event name.

use serde::{Deserialize, Serialize};

/// Inbound events (client → server).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum InboundEvent {
    /// Enter a room under a display name
    Join { room_id: String, username: String },
    /// Replicate the sender's editor buffer to the rest of the room
    CodeChange { room_id: String, code: String },
    /// One-shot document hand-off targeted at a single connection
    SyncCode { socket_id: String, code: String },
    /// Execute the submitted source and broadcast the result
    RunCode {
        room_id: String,
        code: String,
        language: String,
    },
}

/// Event names for outbound frames (server → client).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Joined,
    CodeChange,
    Disconnected,
    CodeOutput,
}

/// One member entry in a `joined` notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub socket_id: String,
    pub username: String,
}

/// Membership notification, sent to the room and to the joiner itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedMessage {
    pub r#type: EventType,
    /// Full membership list of the room, the new joiner included
    pub clients: Vec<ClientInfo>,
    /// Display name of the new joiner
    pub username: String,
    /// Connection id of the new joiner
    pub socket_id: String,
}

/// Document replication frame, relayed room-wide except the sender, and
/// also used for the targeted hand-off triggered by `sync-code`.
#[derive(Debug, Clone, Serialize)]
pub struct CodeChangeMessage {
    pub r#type: EventType,
    pub code: String,
}

/// Membership removal notification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectedMessage {
    pub r#type: EventType,
    pub socket_id: String,
    pub username: String,
}

/// Execution result, broadcast to the whole room (sender included).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeOutputMessage {
    pub r#type: EventType,
    pub output: String,
    pub error: String,
    pub success: bool,
    pub result_kind: String,
}
