//! Session dispatch: one WebSocket connection, one request at a time.
//!
//! Each connection gets its own task from the runtime; within a connection,
//! frames are answered strictly in arrival order because the loop awaits each
//! reply before reading the next frame. Requests from different connections
//! run concurrently, each against its own workspace. Every inbound frame
//! produces exactly one outbound frame; malformed frames are answered with an
//! error reply without touching the pipeline.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use crucible_core::pipeline::CodeRunner;
use crucible_core::RunRequest;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::AppState;

/// Handler for the /ws upgrade endpoint.
pub(crate) async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| session_loop(socket, state.runner))
}

/// Drive one client session until the connection closes.
pub async fn session_loop(socket: WebSocket, runner: Arc<dyn CodeRunner>) {
    let session_id = Uuid::new_v4();
    log::info!("session {} connected", session_id);

    let (mut sender, mut receiver) = socket.split();
    while let Some(frame) = receiver.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("session {} transport error: {}", session_id, e);
                break;
            }
        };

        let reply = match frame {
            Message::Text(text) => dispatch(runner.as_ref(), text.as_str()).await,
            Message::Binary(_) => ServerMessage::error("binary frames are not supported"),
            Message::Close(_) => break,
            // Ping/pong frames are answered by the protocol layer.
            _ => continue,
        };

        if sender.send(Message::Text(reply.to_json().into())).await.is_err() {
            log::debug!("session {} closed while replying", session_id);
            break;
        }
    }

    log::info!("session {} disconnected", session_id);
}

/// Turn one inbound text frame into exactly one reply.
///
/// Parsing happens before the runner is consulted, so an unparseable frame or
/// an unsupported `type` never launches a subprocess.
pub async fn dispatch<R: CodeRunner + ?Sized>(runner: &R, text: &str) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Run { code }) => runner.run(RunRequest::new(code)).await.into(),
        Err(e) => {
            log::debug!("rejecting malformed message: {}", e);
            ServerMessage::error(format!("unsupported request: {}", e))
        }
    }
}
