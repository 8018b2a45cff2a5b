//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::room::{RoomCommand, RoomEvent, RoomHandle};
use crate::util::rate_limit::SessionRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};

type WsSink = SplitSink<WebSocket, Message>;
type WsStream = SplitStream<WebSocket>;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let session_id = Uuid::new_v4();
    debug!(session_id = %session_id, "WebSocket upgrade");
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, session_id: Uuid, state: AppState) {
    info!(session_id = %session_id, "New WebSocket connection");

    let (mut ws_sink, mut ws_stream) = socket.split();
    let rate_limiter = SessionRateLimiter::new();

    let welcome = ServerMsg::Welcome {
        session_id,
        server_time: unix_millis(),
    };
    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(session_id = %session_id, error = %e, "Failed to send welcome");
        return;
    }

    // Nothing but a join is accepted until the session is placed in a room
    let Some((room, vehicle, health)) =
        await_join(session_id, &state, &mut ws_sink, &mut ws_stream, &rate_limiter).await
    else {
        info!(session_id = %session_id, "Connection closed before joining");
        return;
    };

    // Subscribe before joining so the join confirmation is not missed
    let events_rx = room.subscribe();
    let join = RoomCommand::Join {
        session_id,
        vehicle,
        health,
    };
    if room.command_tx.send(join).await.is_err() {
        error!(session_id = %session_id, room_id = %room.id, "Room closed before join");
        return;
    }

    run_session(session_id, &room, ws_sink, ws_stream, events_rx, rate_limiter).await;

    let _ = room.command_tx.send(RoomCommand::Leave { session_id }).await;
    info!(session_id = %session_id, room_id = %room.id, "WebSocket connection closed");
}

/// Read until a valid join arrives; returns the reserved room and the vehicle's stats
async fn await_join(
    session_id: Uuid,
    state: &AppState,
    ws_sink: &mut WsSink,
    ws_stream: &mut WsStream,
    rate_limiter: &SessionRateLimiter,
) -> Option<(RoomHandle, String, u32)> {
    while let Some(result) = ws_stream.next().await {
        let text = match result {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        };
        if !rate_limiter.check_message() {
            warn!(session_id = %session_id, "Rate limited message before join");
            continue;
        }

        let vehicle = match serde_json::from_str::<ClientMsg>(&text) {
            Ok(ClientMsg::Join { vehicle }) => vehicle,
            Ok(ClientMsg::Ping { t }) => {
                let _ = send_msg(ws_sink, &ServerMsg::Pong { t }).await;
                continue;
            }
            Ok(other) => {
                debug!(session_id = %session_id, msg = ?other, "Ignoring message before join");
                continue;
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Failed to parse client message");
                continue;
            }
        };

        match state.catalog.get(&vehicle) {
            Ok(vehicle_type) => {
                let room = state.rooms.join_or_create();
                return Some((room, vehicle, vehicle_type.max_health));
            }
            Err(e) => {
                warn!(session_id = %session_id, vehicle = %vehicle, "Join with unknown vehicle");
                let reply = ServerMsg::error("unknown_vehicle", e.to_string());
                if send_msg(ws_sink, &reply).await.is_err() {
                    return None;
                }
            }
        }
    }
    None
}

/// Run the WebSocket session with read/write split
async fn run_session(
    session_id: Uuid,
    room: &RoomHandle,
    mut ws_sink: WsSink,
    mut ws_stream: WsStream,
    mut events_rx: broadcast::Receiver<RoomEvent>,
    rate_limiter: SessionRateLimiter,
) {
    // Spawn writer task: room events addressed to this session -> WebSocket
    let writer_handle = tokio::spawn(async move {
        loop {
            match events_rx.recv().await {
                Ok(event) => {
                    if !event.audience.includes(session_id) {
                        continue;
                    }
                    if let Err(e) = send_msg(&mut ws_sink, &event.msg).await {
                        debug!(session_id = %session_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(session_id = %session_id, lagged_count = n, "Client lagged, skipping {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(session_id = %session_id, "Room event channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> room
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_message() {
                    warn!(session_id = %session_id, "Rate limited room message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(ClientMsg::Leave) => break,
                    Ok(msg) => {
                        let command = RoomCommand::Message { session_id, msg };
                        if room.command_tx.send(command).await.is_err() {
                            debug!(session_id = %session_id, "Room channel closed");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(session_id = %session_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(session_id = %session_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(session_id = %session_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}

/// Send a message over WebSocket
async fn send_msg(sink: &mut WsSink, msg: &ServerMsg) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json)).await.map_err(|e| e.to_string())
}
