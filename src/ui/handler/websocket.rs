//! WebSocket connection handler.
//!
//! Drives the per-connection lifecycle: connect, event dispatch, and
//! disconnect cleanup. Inbound frames are parsed into the closed
//! `ClientEvent` enum and matched exhaustively; protocol errors go back to
//! the offending connection as `error` events and never terminate it.

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
    domain::{ConnectionId, RoomName, RoomSnapshot, Username},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::{gateway::ClientInfo, state::AppState},
    usecase::{
        ConnectUseCase, CreateRoomUseCase, DisconnectUseCase, JoinRoomUseCase, SendMessageUseCase,
    },
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Create a channel for this client to receive events
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // Register the connection with a temporary guest name
    let connect_usecase = ConnectUseCase::new(state.repository.clone());
    let user = match connect_usecase.execute().await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    let conn_id = user.id.clone();
    tracing::info!(
        "Client connected: {} (Temporary username: {})",
        conn_id,
        user.username
    );

    state
        .gateway
        .attach(
            &conn_id,
            ClientInfo {
                sender: tx,
                connected_at: user.connected_at.value(),
            },
        )
        .await;

    // Confirm the assigned id and guest name to the caller
    state
        .gateway
        .emit_to(
            &conn_id,
            &ServerEvent::UserConnected {
                id: conn_id.as_str().to_string(),
                username: user.username.as_str().to_string(),
            },
        )
        .await;

    // Task draining the outbound channel into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Task receiving frames from this client and dispatching them
    let recv_state = state.clone();
    let recv_id = conn_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_event(&recv_state, &recv_id, &text).await;
                }
                Message::Ping(_) => {
                    // handled automatically by the WebSocket protocol
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_id);
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

    // Disconnect cleanup: detach from the gateway first so the user_left
    // and user_list fan-out below never targets the closing socket
    state.gateway.detach(&conn_id).await;

    let disconnect_usecase = DisconnectUseCase::new(state.repository.clone());
    match disconnect_usecase.execute(&conn_id).await {
        Some(outcome) => {
            if let Some(left_room) = outcome.left_room {
                tracing::info!(
                    "User {} left room {}",
                    outcome.user.username,
                    left_room.name
                );
                let targets = left_room.member_ids();
                state
                    .gateway
                    .emit_to_many(
                        &targets,
                        &ServerEvent::UserLeft {
                            id: conn_id.as_str().to_string(),
                            username: outcome.user.username.as_str().to_string(),
                            room: left_room.name.as_str().to_string(),
                        },
                    )
                    .await;
                tracing::debug!(
                    "Updated user list for room {}: {} users",
                    left_room.name,
                    left_room.members.len()
                );
                state
                    .gateway
                    .emit_to_many(&targets, &ServerEvent::user_list(&left_room))
                    .await;
            }
            tracing::info!(
                "Client disconnected: {} ({})",
                outcome.user.username,
                conn_id
            );
        }
        None => {
            tracing::warn!("Disconnect for unknown connection '{}'", conn_id);
        }
    }
}

/// Parse one inbound frame and route it to the matching use case.
async fn dispatch_event(state: &Arc<AppState>, conn_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse frame from '{}': {}", conn_id, e);
            return;
        }
    };

    match event {
        ClientEvent::CreateRoom {
            room,
            password,
            username,
        } => handle_create_room(state, conn_id, room, password, username).await,
        ClientEvent::JoinRoom {
            room,
            password,
            username,
        } => handle_join_room(state, conn_id, room, password, username).await,
        ClientEvent::Message { text } => handle_message(state, conn_id, &text).await,
    }
}

/// Validate the raw strings of a create/join payload into domain values.
fn parse_identity(
    conn_id: &ConnectionId,
    room: String,
    username: String,
) -> Option<(RoomName, Username)> {
    match (RoomName::new(room), Username::new(username)) {
        (Ok(room), Ok(username)) => Some((room, username)),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Ignoring event with invalid payload from '{}': {}", conn_id, e);
            None
        }
    }
}

async fn handle_create_room(
    state: &Arc<AppState>,
    conn_id: &ConnectionId,
    room: String,
    password: Option<String>,
    username: String,
) {
    let Some((room, username)) = parse_identity(conn_id, room, username) else {
        return;
    };

    let usecase = CreateRoomUseCase::new(state.repository.clone());
    match usecase
        .execute(conn_id, room.clone(), password, username.clone())
        .await
    {
        Ok(snapshot) => {
            tracing::info!("Room created: {} by {}", room, username);
            state
                .gateway
                .emit_to(
                    conn_id,
                    &ServerEvent::RoomCreated {
                        room: room.as_str().to_string(),
                    },
                )
                .await;
            emit_join_effects(state, conn_id, &snapshot, &username).await;
        }
        Err(e) => {
            tracing::error!("Failed to create room {}: {}", room, e);
            state.gateway.emit_to(conn_id, &ServerEvent::error(&e)).await;
        }
    }
}

async fn handle_join_room(
    state: &Arc<AppState>,
    conn_id: &ConnectionId,
    room: String,
    password: Option<String>,
    username: String,
) {
    let Some((room, username)) = parse_identity(conn_id, room, username) else {
        return;
    };

    let usecase = JoinRoomUseCase::new(state.repository.clone());
    match usecase
        .execute(conn_id, room.clone(), password, username.clone())
        .await
    {
        Ok(snapshot) => emit_join_effects(state, conn_id, &snapshot, &username).await,
        Err(e) => {
            tracing::error!("Failed to join room {}: {}", room, e);
            state.gateway.emit_to(conn_id, &ServerEvent::error(&e)).await;
        }
    }
}

/// Join confirmation to the caller, then the member list to the room.
async fn emit_join_effects(
    state: &Arc<AppState>,
    conn_id: &ConnectionId,
    snapshot: &RoomSnapshot,
    username: &Username,
) {
    tracing::info!("User {} joined room {}", username, snapshot.name);
    state
        .gateway
        .emit_to(
            conn_id,
            &ServerEvent::RoomJoined {
                room: snapshot.name.as_str().to_string(),
                username: username.as_str().to_string(),
            },
        )
        .await;
    tracing::debug!(
        "Updated user list for room {}: {} users",
        snapshot.name,
        snapshot.members.len()
    );
    state
        .gateway
        .emit_to_many(&snapshot.member_ids(), &ServerEvent::user_list(snapshot))
        .await;
}

async fn handle_message(state: &Arc<AppState>, conn_id: &ConnectionId, text: &str) {
    let usecase = SendMessageUseCase::new(state.repository.clone());
    match usecase.execute(conn_id, text).await {
        Ok(message) => {
            tracing::info!("Message from {} in {}", message.sender, message.room);
            state
                .gateway
                .emit_to_many(
                    &message.targets,
                    &ServerEvent::Message {
                        sender: message.sender.as_str().to_string(),
                        text: message.text,
                        timestamp: message.timestamp,
                        room: message.room.as_str().to_string(),
                    },
                )
                .await;
        }
        Err(e) => {
            tracing::error!("Message from '{}' failed: {}", conn_id, e);
            state.gateway.emit_to(conn_id, &ServerEvent::error(&e)).await;
        }
    }
}
