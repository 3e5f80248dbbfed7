//! The authoritative timer store and its state machine

use std::sync::Arc;

use tracing::{debug, info};

use super::timer_state::{whole_seconds_between, Phase, TimerSettings, TimerState};
use crate::clock::TimeSource;

/// Intent coming from a viewer, already decoded from the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    Start(TimerSettings),
    Stop,
    Reset,
    SetScreen(Phase),
    /// Anything the server does not understand
    Unknown(String),
}

impl TimerAction {
    /// Short name used for logging and the `/status` report
    pub fn name(&self) -> &str {
        match self {
            TimerAction::Start(_) => "start",
            TimerAction::Stop => "stop",
            TimerAction::Reset => "reset",
            TimerAction::SetScreen(_) => "set_screen",
            TimerAction::Unknown(kind) => kind.as_str(),
        }
    }
}

/// Result of applying one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The action mutated the state; the snapshot must be broadcast
    Applied(TimerState),
    /// The action was ignored; the snapshot is the unchanged state
    Ignored(TimerState),
}

impl ApplyOutcome {
    pub fn state(&self) -> &TimerState {
        match self {
            ApplyOutcome::Applied(state) | ApplyOutcome::Ignored(state) => state,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_))
    }
}

/// Owns the one timer state and performs every transition on it
pub struct TimerStateStore {
    state: TimerState,
    clock: Arc<dyn TimeSource>,
}

impl TimerStateStore {
    /// Create a store holding the default state
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            state: TimerState::new(),
            clock,
        }
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> TimerState {
        self.state.clone()
    }

    /// Current time according to the store's clock
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Apply an action and return the resulting snapshot
    pub fn apply(&mut self, action: &TimerAction) -> ApplyOutcome {
        match action {
            TimerAction::Start(settings) => {
                let now = self.clock.now_millis();
                self.state.settings = *settings;
                self.state.start_time = Some(now);
                self.state.elapsed_at_stop = 0;
                self.state.phase = Phase::Running;
                info!(
                    green = settings.green,
                    yellow = settings.yellow,
                    red = settings.red,
                    bell = settings.bell,
                    "Timer started"
                );
            }
            TimerAction::Stop => {
                if let (Phase::Running, Some(start)) = (self.state.phase, self.state.start_time) {
                    self.state.elapsed_at_stop =
                        whole_seconds_between(start, self.clock.now_millis());
                }
                self.state.start_time = None;
                self.state.phase = Phase::Stopped;
                info!(elapsed = self.state.elapsed_at_stop, "Timer stopped");
            }
            TimerAction::Reset => {
                self.state = TimerState::new();
                info!("Timer reset to default state");
            }
            TimerAction::SetScreen(target @ (Phase::Template | Phase::CustomSetup)) => {
                self.state.phase = *target;
                self.state.start_time = None;
                self.state.elapsed_at_stop = 0;
                info!("Screen changed to {}", target);
            }
            TimerAction::SetScreen(target) => {
                debug!("Ignoring request to switch screen to {}", target);
                return ApplyOutcome::Ignored(self.snapshot());
            }
            TimerAction::Unknown(kind) => {
                debug!("Ignoring unknown action type: {}", kind);
                return ApplyOutcome::Ignored(self.snapshot());
            }
        }

        ApplyOutcome::Applied(self.snapshot())
    }
}

impl std::fmt::Debug for TimerStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerStateStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
