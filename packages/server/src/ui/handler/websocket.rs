//! WebSocket connection handlers.
//!
//! One duplex connection per participant. Inbound frames are parsed into
//! `InboundEvent` and dispatched to the use case layer; each event is
//! processed to completion before the next frame is read, so membership
//! mutations never interleave. The only exception is `run-code`, which is
//! spawned onto its own task so a compile or a long-running program never
//! blocks the coordination loop.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{
        ClientId, ExecutionRequest, Participant, PusherChannel, RoomId, Timestamp, Username,
    },
    infrastructure::dto::websocket::{
        ClientInfo, CodeChangeMessage, CodeOutputMessage, DisconnectedMessage, EventType,
        InboundEvent, JoinedMessage,
    },
    usecase::LeaveError,
};
use dojo_shared::time::now_unix_millis;

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This function handles the outbound event flow: events produced by other
/// connections (via the rx channel) are written to this client's socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // The connection id is minted server-side; clients learn it from the
    // joined notification.
    let client_id = ClientId::generate();
    tracing::info!("Connection '{}' established", client_id);

    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let recv_client_id = client_id.clone();
    let recv_tx = tx.clone();

    // Receive frames from this client and dispatch them one at a time
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_event(&recv_state, &recv_client_id, &recv_tx, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_client_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Remove the membership and notify the former room
    match state.leave_room_usecase.execute(&client_id).await {
        Ok(removed) => {
            tracing::info!(
                "Connection '{}' disconnected, removed from room '{}'",
                client_id,
                removed.room_id
            );

            let left_msg = DisconnectedMessage {
                r#type: EventType::Disconnected,
                socket_id: removed.id.as_str().to_string(),
                username: removed.username.as_str().to_string(),
            };

            let left_json = serde_json::to_string(&left_msg).unwrap();
            if let Err(e) = state
                .leave_room_usecase
                .broadcast_left(&removed.room_id, &left_json)
                .await
            {
                tracing::warn!("Failed to broadcast disconnected: {}", e);
            }
        }
        Err(LeaveError::NotJoined(_)) => {
            tracing::debug!("Connection '{}' closed before joining a room", client_id);
        }
    }
}

/// Parse one inbound frame and route it to the matching use case. Malformed
/// frames are logged and dropped, never trusted.
async fn dispatch_event(
    state: &Arc<AppState>,
    client_id: &ClientId,
    tx: &PusherChannel,
    text: &str,
) {
    let event = match serde_json::from_str::<InboundEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Ignoring malformed event: {}", e);
            return;
        }
    };

    match event {
        InboundEvent::Join { room_id, username } => {
            handle_join(state, client_id, tx, room_id, username).await;
        }
        InboundEvent::CodeChange { room_id, code } => {
            handle_code_change(state, client_id, room_id, code).await;
        }
        InboundEvent::SyncCode { socket_id, code } => {
            handle_sync_code(state, socket_id, code).await;
        }
        InboundEvent::RunCode {
            room_id,
            code,
            language,
        } => {
            handle_run_code(state, room_id, code, language);
        }
    }
}

async fn handle_join(
    state: &Arc<AppState>,
    client_id: &ClientId,
    tx: &PusherChannel,
    room_id: String,
    username: String,
) {
    let room_id = match RoomId::try_from(room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Rejecting join with invalid room id: {}", e);
            return;
        }
    };
    let username = match Username::try_from(username) {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!("Rejecting join with invalid username: {}", e);
            return;
        }
    };

    let participant = Participant::new(
        client_id.clone(),
        username.clone(),
        room_id.clone(),
        Timestamp::new(now_unix_millis()),
    );

    let members = state
        .join_room_usecase
        .execute(participant, tx.clone())
        .await;
    tracing::info!(
        "'{}' joined room '{}' ({} members)",
        username,
        room_id,
        members.len()
    );

    let joined_msg = JoinedMessage {
        r#type: EventType::Joined,
        clients: members.iter().map(ClientInfo::from).collect(),
        username: username.as_str().to_string(),
        socket_id: client_id.as_str().to_string(),
    };
    let joined_json = serde_json::to_string(&joined_msg).unwrap();

    // Everyone already in the room learns about the joiner first
    if let Err(e) = state
        .join_room_usecase
        .broadcast_joined(&room_id, client_id, &joined_json)
        .await
    {
        tracing::warn!("Failed to broadcast joined: {}", e);
    }

    // The joiner itself learns its connection id and the membership list.
    // Peers are expected to follow up with sync-code for the document
    // hand-off once they see the notification.
    if let Err(e) = state
        .join_room_usecase
        .notify_joiner(client_id, &joined_json)
        .await
    {
        tracing::warn!("Failed to notify joiner: {}", e);
    }
}

async fn handle_code_change(
    state: &Arc<AppState>,
    client_id: &ClientId,
    room_id: String,
    code: String,
) {
    let room_id = match RoomId::try_from(room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Ignoring code change with invalid room id: {}", e);
            return;
        }
    };

    let message = CodeChangeMessage {
        r#type: EventType::CodeChange,
        code,
    };
    let json = serde_json::to_string(&message).unwrap();

    let targets = state
        .relay_code_change_usecase
        .execute(client_id, &room_id, &json)
        .await;
    tracing::debug!(
        "Relayed code change from '{}' to {} members of room '{}'",
        client_id,
        targets.len(),
        room_id
    );
}

async fn handle_sync_code(state: &Arc<AppState>, socket_id: String, code: String) {
    let target_id = match ClientId::try_from(socket_id) {
        Ok(target_id) => target_id,
        Err(e) => {
            tracing::warn!("Ignoring sync-code with invalid socket id: {}", e);
            return;
        }
    };

    // The hand-off is relayed as a plain code-change targeted at one
    // connection; the receiving editor treats it like any other edit.
    let message = CodeChangeMessage {
        r#type: EventType::CodeChange,
        code,
    };
    let json = serde_json::to_string(&message).unwrap();

    if let Err(e) = state.sync_code_usecase.execute(&target_id, &json).await {
        tracing::warn!("Failed to hand off document to '{}': {}", target_id, e);
    }
}

fn handle_run_code(state: &Arc<AppState>, room_id: String, code: String, language: String) {
    let room_id = match RoomId::try_from(room_id) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Ignoring run-code with invalid room id: {}", e);
            return;
        }
    };

    // Compiling and running are slow; hand them their own task so the
    // coordination loop keeps serving membership and edit events. Two
    // requests racing in one room broadcast their results in completion
    // order.
    let state = state.clone();
    tokio::spawn(async move {
        let request = ExecutionRequest {
            room_id: room_id.clone(),
            source: code,
            language,
        };
        let outcome = state.run_code_usecase.dispatch(&request).await;

        let message = CodeOutputMessage::from(&outcome);
        let json = serde_json::to_string(&message).unwrap();
        if let Err(e) = state
            .run_code_usecase
            .broadcast_output(&room_id, &json)
            .await
        {
            tracing::warn!("Failed to broadcast execution result: {}", e);
        }
    });
}
