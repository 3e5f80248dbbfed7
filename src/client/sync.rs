//! Client-side view of the shared timer.
//!
//! [`SyncClient`] never decides what the timer is doing; it only mirrors the
//! last state pushed by the server, keeps an estimate of how far the local
//! clock is from the server clock, and tracks which alerts already fired
//! for the current run. All methods take the local time explicitly so the
//! whole thing can be driven deterministically.

use tracing::debug;

use super::{
    display::{format_clock, Display, Panel, STATUS_BELL, STATUS_READY, STATUS_STOPPED, STATUS_TIMING},
    evaluator::{evaluate, AlertFlags, ThresholdEvent},
};
use crate::{
    protocol::ServerMessage,
    state::{timer_state::whole_seconds_between, Phase, TimerState},
};

/// Estimated `server - local` clock difference in milliseconds
pub fn clock_offset(server_time: i64, local_now: i64) -> i64 {
    server_time - local_now
}

/// Identifies one timing run; alert flags belong to exactly one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFingerprint {
    pub phase: Phase,
    pub start_time: Option<i64>,
}

/// Side effects the viewer runtime must carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEffect {
    /// Play the double alert now and start repeating every few seconds
    RingBell,
    /// Stop any repeating bell alert
    CancelBellRepeat,
}

#[derive(Debug, Default)]
pub struct SyncClient {
    state: Option<TimerState>,
    offset_millis: i64,
    flags: AlertFlags,
    fingerprint: Option<RunFingerprint>,
    bell_repeating: bool,
    display: Display,
}

impl SyncClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&TimerState> {
        self.state.as_ref()
    }

    pub fn offset_millis(&self) -> i64 {
        self.offset_millis
    }

    pub fn flags(&self) -> AlertFlags {
        self.flags
    }

    pub fn fingerprint(&self) -> Option<RunFingerprint> {
        self.fingerprint
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Adopt a state pushed by the server
    pub fn apply_message(&mut self, message: ServerMessage, local_now: i64) -> Vec<ClientEffect> {
        let ServerMessage::State { state, server_time } = message;
        self.offset_millis = clock_offset(server_time, local_now);

        let mut effects = Vec::new();
        match state.phase {
            Phase::Template | Phase::CustomSetup => {
                self.reset_run();
                self.fingerprint = None;
                self.display.status = STATUS_READY.to_string();
                self.cancel_bell(&mut effects);
            }
            Phase::Running => {
                let fingerprint = RunFingerprint {
                    phase: state.phase,
                    start_time: state.start_time,
                };
                if self.fingerprint != Some(fingerprint) {
                    debug!(start_time = ?state.start_time, "New timer run");
                    self.fingerprint = Some(fingerprint);
                    self.reset_run();
                    self.display.status = STATUS_TIMING.to_string();
                    self.cancel_bell(&mut effects);
                }
            }
            Phase::Stopped => {
                self.display.status = STATUS_STOPPED.to_string();
                self.cancel_bell(&mut effects);
            }
        }

        self.display.panel = Panel::from(state.phase);
        self.state = Some(state);
        self.display.clock = format_clock(self.elapsed_seconds(local_now));
        effects
    }

    /// Elapsed seconds as seen through the server-adjusted clock
    pub fn elapsed_seconds(&self, local_now: i64) -> u64 {
        let Some(state) = &self.state else {
            return 0;
        };
        match (state.phase, state.start_time) {
            (Phase::Running, Some(start)) => {
                whole_seconds_between(start, local_now.saturating_add(self.offset_millis))
            }
            (Phase::Stopped, _) => state.elapsed_at_stop,
            _ => 0,
        }
    }

    /// Periodic refresh: update the clock and fire any newly reached alerts
    pub fn tick(&mut self, local_now: i64) -> Vec<ClientEffect> {
        let mut effects = Vec::new();
        let Some((phase, settings)) = self.state.as_ref().map(|s| (s.phase, s.settings)) else {
            return effects;
        };

        let elapsed = self.elapsed_seconds(local_now);
        self.display.clock = format_clock(elapsed);

        let evaluation = evaluate(elapsed, &settings, self.flags, phase);
        self.flags = evaluation.flags;

        for event in evaluation.events {
            match event {
                ThresholdEvent::CardReached(color) => {
                    self.display.card = Some(color);
                    self.display.status = color.status_text().to_string();
                }
                ThresholdEvent::Bell => {
                    self.display.status = STATUS_BELL.to_string();
                    self.bell_repeating = true;
                    effects.push(ClientEffect::RingBell);
                }
            }
        }

        if phase != Phase::Running {
            self.cancel_bell(&mut effects);
        }

        effects
    }

    fn reset_run(&mut self) {
        self.flags = AlertFlags::default();
        self.display.card = None;
    }

    fn cancel_bell(&mut self, effects: &mut Vec<ClientEffect>) {
        if self.bell_repeating {
            self.bell_repeating = false;
            effects.push(ClientEffect::CancelBellRepeat);
        }
    }
}
