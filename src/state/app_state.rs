//! Main application state management

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{ApplyOutcome, TimerAction, TimerState, TimerStateStore};
use crate::{clock::TimeSource, protocol::ServerMessage};

/// Capacity of the broadcast channel feeding every viewer connection
const BROADCAST_CAPACITY: usize = 64;

/// Shared server state: the timer store plus fan-out and bookkeeping
#[derive(Debug)]
pub struct AppState {
    /// The one authoritative timer, every mutation goes through this lock
    store: Mutex<TimerStateStore>,
    /// Fan-out of state snapshots to all connected viewers
    state_tx: broadcast::Sender<ServerMessage>,
    /// Number of open viewer connections
    viewers: AtomicUsize,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    /// Create a new AppState holding the default timer state
    pub fn new(port: u16, host: String, clock: Arc<dyn TimeSource>) -> Self {
        let (state_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        Self {
            store: Mutex::new(TimerStateStore::new(clock)),
            state_tx,
            viewers: AtomicUsize::new(0),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    /// Apply an action and, if it changed anything, broadcast the new state.
    ///
    /// The broadcast is queued while the store lock is held so that viewers
    /// observe snapshots in the same order the actions were applied.
    pub fn apply(&self, action: &TimerAction) -> Result<ApplyOutcome, String> {
        let mut store = self.store.lock()
            .map_err(|e| format!("Failed to lock timer store: {}", e))?;

        let outcome = store.apply(action);
        if outcome.is_applied() {
            let message = ServerMessage::state(outcome.state().clone(), store.now_millis());
            // An error only means nobody is connected right now
            if self.state_tx.send(message).is_err() {
                debug!("No viewers connected to receive {} broadcast", action.name());
            }
        }
        drop(store);

        if outcome.is_applied() {
            match self.last_action.lock() {
                Ok(mut last) => *last = Some((action.name().to_string(), Utc::now())),
                Err(e) => warn!("Failed to record last action: {}", e),
            }
        }

        Ok(outcome)
    }

    /// Full state message for a freshly connected or lagging viewer
    pub fn current_message(&self) -> Result<ServerMessage, String> {
        let store = self.store.lock()
            .map_err(|e| format!("Failed to lock timer store: {}", e))?;
        Ok(ServerMessage::state(store.snapshot(), store.now_millis()))
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.store.lock()
            .map(|store| store.snapshot())
            .map_err(|e| format!("Failed to lock timer store: {}", e))
    }

    /// Snapshot for a new viewer together with its subscription.
    ///
    /// Both are taken under the store lock, so the receiver yields exactly
    /// the states applied after the snapshot.
    pub fn subscribe_with_snapshot(
        &self,
    ) -> Result<(ServerMessage, broadcast::Receiver<ServerMessage>), String> {
        let store = self.store.lock()
            .map_err(|e| format!("Failed to lock timer store: {}", e))?;
        let message = ServerMessage::state(store.snapshot(), store.now_millis());
        Ok((message, self.state_tx.subscribe()))
    }

    /// Subscribe to state broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.state_tx.subscribe()
    }

    /// Register an open viewer connection, returning the new count
    pub fn viewer_connected(&self) -> usize {
        self.viewers.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Forget a closed viewer connection, returning the new count
    pub fn viewer_disconnected(&self) -> usize {
        self.viewers.fetch_sub(1, Ordering::SeqCst).saturating_sub(1)
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.load(Ordering::SeqCst)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last applied action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((name, at)) => (Some(name), Some(at)),
            None => (None, None),
        }
    }
}
