//! WebSocket endpoint that keeps every viewer in sync with the store

use std::sync::Arc;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Request, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::{
    protocol::{decode_action, ServerMessage},
    state::AppState,
};

/// Handle GET /ws - Upgrade to a viewer connection
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle GET / - Upgrade when the request asks for a WebSocket, otherwise
/// serve the static viewer if one is configured
pub async fn root_handler(
    ws: Option<WebSocketUpgrade>,
    state: Arc<AppState>,
    assets: Option<ServeDir>,
    request: Request,
) -> Response {
    if let Some(ws) = ws {
        return ws.on_upgrade(move |socket| handle_socket(socket, state));
    }

    match assets {
        Some(assets) => match assets.oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        },
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> anyhow::Result<()> {
    let text = message.to_json()?;
    sender.send(Message::Text(text)).await?;
    Ok(())
}

/// Drive one viewer connection until it closes
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let viewers = state.viewer_connected();
    info!(viewers, "Viewer connected");

    let (mut sender, mut receiver) = socket.split();
    let (message, mut updates) = match state.subscribe_with_snapshot() {
        Ok(subscription) => subscription,
        Err(e) => {
            error!("Failed to read state for new viewer: {}", e);
            finish(&state);
            return;
        }
    };

    if let Err(e) = send_message(&mut sender, &message).await {
        debug!("Failed to send initial state: {}", e);
        finish(&state);
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => {
                let message = match update {
                    Ok(message) => message,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Viewer lagged behind broadcasts, resending latest state");
                        match state.current_message() {
                            Ok(message) => message,
                            Err(e) => {
                                error!("Failed to read state for lagging viewer: {}", e);
                                continue;
                            }
                        }
                    }
                    Err(RecvError::Closed) => break,
                };

                if let Err(e) = send_message(&mut sender, &message).await {
                    debug!("Failed to push state to viewer: {}", e);
                    break;
                }
            }

            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => handle_text(&state, &text),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!("Viewer socket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    finish(&state);
}

fn finish(state: &AppState) {
    let viewers = state.viewer_disconnected();
    info!(viewers, "Viewer disconnected");
}

/// Apply one inbound frame. Malformed frames are dropped silently.
fn handle_text(state: &AppState, text: &str) {
    let Some(action) = decode_action(text) else {
        debug!("Dropping malformed viewer message");
        return;
    };

    match state.apply(&action) {
        Ok(outcome) if outcome.is_applied() => debug!("Applied {} action", action.name()),
        Ok(_) => debug!("Ignored {} action", action.name()),
        Err(e) => error!("Failed to apply {} action: {}", action.name(), e),
    }
}
