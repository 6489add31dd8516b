//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ClientCommand, ConnectionId, ConnectionIdFactory},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::ChatError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

/// `GET /ws?token=<jwt>`
///
/// The token is verified before the upgrade: failures answer `401` and no
/// socket is ever opened.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Response {
    let connection_id = match ConnectionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to generate connection id: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Frames pushed before the upgrade completes wait in this channel
    let (tx, rx) = mpsc::unbounded_channel();

    match state
        .router
        .connect(connection_id.clone(), query.token.as_deref(), tx)
        .await
    {
        Ok(_session) => {
            let failed_state = state.clone();
            let failed_id = connection_id.clone();
            ws.on_failed_upgrade(move |error| {
                tracing::warn!("WebSocket upgrade of '{}' failed: {}", failed_id, error);
                tokio::spawn(async move {
                    failed_state.router.disconnect(&failed_id).await;
                });
            })
            .on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx))
        }
        Err(ChatError::Unauthorized) => StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to open session '{}': {:?}", connection_id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Spawns a task that forwards frames queued for this connection to its socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that decodes inbound frames and dispatches them one at a time,
/// in arrival order.
fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            state.router.reject(&connection_id, e).await;
                            continue;
                        }
                    };
                    match ClientCommand::try_from(event) {
                        Ok(command) => state.router.dispatch(&connection_id, command).await,
                        Err(invalid) => {
                            state.router.reject_command(&connection_id, invalid).await
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receive_loop(receiver, state.clone(), connection_id.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.router.disconnect(&connection_id).await;
}
