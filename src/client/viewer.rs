//! Terminal viewer runtime: ties the connection, the tick and user input
//! to a [`SyncClient`]

use std::{io::BufRead, sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    time::{interval, timeout, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use super::{
    alert::{AlertPlayer, BellRepeater},
    connection::{run_connection, ConnectionEvent},
    input::{parse_command, UserCommand, HELP},
    sync::{ClientEffect, SyncClient},
};
use crate::{clock::TimeSource, config::ViewerConfig, protocol::ClientAction, utils::shutdown_signal};

/// How long to wait for the connection to close after the viewer quits
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// A viewer: mirrors server state and performs local effects
pub struct Viewer {
    client: SyncClient,
    bell: BellRepeater,
    clock: Arc<dyn TimeSource>,
    last_frame: Option<String>,
}

impl Viewer {
    pub fn new(player: Arc<dyn AlertPlayer>, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            client: SyncClient::new(),
            bell: BellRepeater::new(player),
            clock,
            last_frame: None,
        }
    }

    pub fn client(&self) -> &SyncClient {
        &self.client
    }

    pub fn bell_ringing(&self) -> bool {
        self.bell.is_ringing()
    }

    /// React to the connection task
    pub fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => info!("Synchronized with timer server"),
            ConnectionEvent::Disconnected => warn!("Lost connection to timer server, retrying"),
            ConnectionEvent::State(message) => {
                let effects = self.client.apply_message(message, self.clock.now_millis());
                self.perform(effects);
            }
        }
    }

    /// Periodic refresh
    pub fn handle_tick(&mut self) {
        let effects = self.client.tick(self.clock.now_millis());
        self.perform(effects);
    }

    fn perform(&mut self, effects: Vec<ClientEffect>) {
        for effect in effects {
            match effect {
                ClientEffect::RingBell => self.bell.ring(),
                ClientEffect::CancelBellRepeat => self.bell.cancel(),
            }
        }
    }

    /// The current frame if it differs from the last one returned
    pub fn next_frame(&mut self) -> Option<String> {
        let frame = self.client.display().render();
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return None;
        }
        self.last_frame = Some(frame.clone());
        Some(frame)
    }
}

/// Read stdin on a plain thread so a pending read never holds up shutdown
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Run the terminal viewer until the user quits or a signal arrives
pub async fn run_viewer(
    config: &ViewerConfig,
    player: Arc<dyn AlertPlayer>,
    clock: Arc<dyn TimeSource>,
) -> anyhow::Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel::<ConnectionEvent>(32);
    let (action_tx, action_rx) = mpsc::channel::<ClientAction>(32);

    let connection = tokio::spawn(run_connection(
        config.url.clone(),
        config.reconnect_delay(),
        event_tx,
        action_rx,
    ));

    let mut viewer = Viewer::new(player, clock);
    let mut ticker = interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    println!("{}", HELP);

    loop {
        tokio::select! {
            _ = ticker.tick() => viewer.handle_tick(),

            event = event_rx.recv() => match event {
                Some(event) => viewer.handle_event(event),
                None => {
                    warn!("Connection task ended");
                    break;
                }
            },

            line = lines.recv(), if stdin_open => match line {
                Some(line) => match parse_command(&line) {
                    Ok(Some(UserCommand::Send(action))) => {
                        // The display only changes once the server echoes the new state
                        if action_tx.send(action).await.is_err() {
                            warn!("Connection task ended");
                            break;
                        }
                    }
                    Ok(Some(UserCommand::Help)) => println!("{}", HELP),
                    Ok(Some(UserCommand::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                },
                None => {
                    debug!("stdin closed, viewer continues in display-only mode");
                    stdin_open = false;
                }
            },

            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }

        if let Some(frame) = viewer.next_frame() {
            println!("{}", frame);
        }
    }

    drop(action_tx);
    drop(event_rx);
    match timeout(CLOSE_GRACE, connection).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!("Connection task did not finish cleanly: {}", e),
        Err(_) => debug!("Connection task still busy, leaving it behind"),
    }
    Ok(())
}
