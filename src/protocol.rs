//! JSON wire protocol spoken between the server and viewers

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::state::{Phase, TimerAction, TimerSettings, TimerState};

/// Messages pushed from the server to viewers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    State {
        state: TimerState,
        #[serde(rename = "serverTime")]
        server_time: i64,
    },
}

impl ServerMessage {
    pub fn state(state: TimerState, server_time: i64) -> Self {
        ServerMessage::State { state, server_time }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Action messages sent from viewers to the server.
///
/// Fields are kept loosely typed so that a sloppy client never gets its
/// message rejected outright: settings are coerced and screens validated by
/// [`ClientAction::into_action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientAction {
    Start {
        #[serde(default)]
        settings: Value,
    },
    Stop,
    Reset,
    SetScreen {
        #[serde(default)]
        screen: Value,
    },
    #[serde(other)]
    Unknown,
}

impl ClientAction {
    /// Build a start message from already validated settings
    pub fn start(settings: TimerSettings) -> Self {
        ClientAction::Start {
            settings: json!({
                "green": settings.green,
                "yellow": settings.yellow,
                "red": settings.red,
                "bell": settings.bell,
            }),
        }
    }

    pub fn set_screen(phase: Phase) -> Self {
        ClientAction::SetScreen {
            screen: Value::String(phase.as_str().to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Convert the wire message into a store action
    pub fn into_action(self) -> TimerAction {
        match self {
            ClientAction::Start { settings } => TimerAction::Start(TimerSettings::sanitize(&settings)),
            ClientAction::Stop => TimerAction::Stop,
            ClientAction::Reset => TimerAction::Reset,
            ClientAction::SetScreen { screen } => match screen.as_str().and_then(Phase::from_wire) {
                Some(phase) => TimerAction::SetScreen(phase),
                None => TimerAction::Unknown(format!("set_screen:{}", screen)),
            },
            ClientAction::Unknown => TimerAction::Unknown("unknown".to_string()),
        }
    }
}

/// Decode an inbound text frame. `None` means the frame was not a valid
/// action object and must be dropped.
pub fn decode_action(text: &str) -> Option<TimerAction> {
    serde_json::from_str::<ClientAction>(text)
        .ok()
        .map(ClientAction::into_action)
}
