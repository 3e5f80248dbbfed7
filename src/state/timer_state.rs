//! Timer state structure shared between the server and every viewer

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four mutually exclusive timer screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Template,
    #[serde(rename = "custom")]
    CustomSetup,
    Running,
    Stopped,
}

impl Phase {
    /// Wire name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Template => "template",
            Phase::CustomSetup => "custom",
            Phase::Running => "running",
            Phase::Stopped => "stopped",
        }
    }

    /// Parse a wire name, returning `None` for anything unrecognised
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "template" => Some(Phase::Template),
            "custom" => Some(Phase::CustomSetup),
            "running" => Some(Phase::Running),
            "stopped" => Some(Phase::Stopped),
            _ => None,
        }
    }

    /// Whether the timer clock panel is shown in this phase
    pub fn shows_clock(&self) -> bool {
        matches!(self, Phase::Running | Phase::Stopped)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card and bell thresholds in whole seconds. Zero disables a threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default)]
    pub green: u64,
    #[serde(default)]
    pub yellow: u64,
    #[serde(default)]
    pub red: u64,
    #[serde(default)]
    pub bell: u64,
}

impl TimerSettings {
    pub fn new(green: u64, yellow: u64, red: u64, bell: u64) -> Self {
        Self { green, yellow, red, bell }
    }

    /// Build settings from an untrusted JSON value, coercing every field
    /// that is not a usable non-negative number to zero
    pub fn sanitize(raw: &Value) -> Self {
        let field = |name: &str| raw.get(name).map(coerce_seconds).unwrap_or(0);
        Self {
            green: field("green"),
            yellow: field("yellow"),
            red: field("red"),
            bell: field("bell"),
        }
    }

    /// True when no threshold is configured
    pub fn is_empty(&self) -> bool {
        self.green == 0 && self.yellow == 0 && self.red == 0 && self.bell == 0
    }
}

/// Coerce a loosely typed JSON value into whole non-negative seconds
fn coerce_seconds(value: &Value) -> u64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 => n.floor().min(u64::MAX as f64) as u64,
        _ => 0,
    }
}

/// The single authoritative timer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    #[serde(rename = "screen")]
    pub phase: Phase,
    #[serde(default)]
    pub settings: TimerSettings,
    /// Epoch milliseconds when the current run began, only while running
    #[serde(rename = "startTime", default)]
    pub start_time: Option<i64>,
    /// Frozen elapsed seconds, only meaningful while stopped
    #[serde(rename = "elapsedAtStop", default)]
    pub elapsed_at_stop: u64,
}

impl TimerState {
    /// Create the default idle state shown on the template screen
    pub fn new() -> Self {
        Self {
            phase: Phase::Template,
            settings: TimerSettings::default(),
            start_time: None,
            elapsed_at_stop: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Elapsed whole seconds at `now_millis`, as seen from the server clock
    pub fn elapsed_seconds(&self, now_millis: i64) -> u64 {
        match (self.phase, self.start_time) {
            (Phase::Running, Some(start)) => whole_seconds_between(start, now_millis),
            (Phase::Stopped, _) => self.elapsed_at_stop,
            _ => 0,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// `max(0, floor((end - start) / 1000))`
pub fn whole_seconds_between(start_millis: i64, end_millis: i64) -> u64 {
    let delta = end_millis.saturating_sub(start_millis);
    if delta <= 0 {
        0
    } else {
        (delta / 1000) as u64
    }
}
