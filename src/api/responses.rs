//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerState;

/// Status report: the current timer plus server bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: TimerState,
    #[serde(rename = "serverTime")]
    pub server_time: i64,
    pub viewers: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Build identification shown in the viewer footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub commit: String,
    pub date: String,
}

impl VersionInfo {
    /// Read the commit and build date baked in at compile time
    pub fn from_build_env() -> Self {
        Self {
            commit: option_env!("SPEECH_TIMER_COMMIT").unwrap_or("unknown").to_string(),
            date: option_env!("SPEECH_TIMER_BUILD_DATE").unwrap_or("N/A").to_string(),
        }
    }
}
