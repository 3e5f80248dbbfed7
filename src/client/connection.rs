//! Reconnecting WebSocket link from a viewer to the timer server

use std::time::Duration;
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, time::sleep};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::protocol::{ClientAction, ServerMessage};

/// What the connection task reports to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected,
    State(ServerMessage),
    Disconnected,
}

/// Why a single session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// The server went away; try again later
    Closed,
    /// The viewer is shutting down
    Shutdown,
}

/// Keep a connection to `url` alive until the viewer drops its channels.
///
/// Incoming state messages are forwarded on `events`, actions received on
/// `actions` are sent upstream. After any disconnect or failed attempt the
/// task waits `reconnect_delay` and tries again, forever. Actions issued
/// while disconnected are dropped.
pub async fn run_connection(
    url: String,
    reconnect_delay: Duration,
    events: mpsc::Sender<ConnectionEvent>,
    mut actions: mpsc::Receiver<ClientAction>,
) {
    loop {
        match run_session(&url, &events, &mut actions).await {
            Ok(SessionEnd::Shutdown) => {
                debug!("Viewer closed, ending connection task");
                return;
            }
            Ok(SessionEnd::Closed) => info!("Connection to timer server closed"),
            Err(e) => warn!("Connection to {} failed: {}", url, e),
        }

        if events.send(ConnectionEvent::Disconnected).await.is_err() {
            return;
        }

        let retry = sleep(reconnect_delay);
        tokio::pin!(retry);
        loop {
            tokio::select! {
                _ = &mut retry => break,
                action = actions.recv() => match action {
                    Some(action) => debug!(?action, "Not connected, dropping action"),
                    None => return,
                },
            }
        }
        debug!("Reconnecting to {}", url);
    }
}

async fn run_session(
    url: &str,
    events: &mpsc::Sender<ConnectionEvent>,
    actions: &mut mpsc::Receiver<ClientAction>,
) -> anyhow::Result<SessionEnd> {
    let (ws_stream, _) = connect_async(url).await?;
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    info!(url, "Connected to timer server");
    if events.send(ConnectionEvent::Connected).await.is_err() {
        return Ok(SessionEnd::Shutdown);
    }

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(message) => {
                                if events.send(ConnectionEvent::State(message)).await.is_err() {
                                    return Ok(SessionEnd::Shutdown);
                                }
                            }
                            Err(e) => debug!("Ignoring unreadable server message: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return Ok(SessionEnd::Closed),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }

            action = actions.recv() => {
                let Some(action) = action else {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    return Ok(SessionEnd::Shutdown);
                };
                let text = action.to_json()?;
                ws_tx.send(Message::Text(text)).await?;
            }
        }
    }
}
