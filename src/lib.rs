//! Speech Timer - one shared timer, many synchronized viewers
//!
//! The server owns a single timer state and pushes every change to all
//! connected viewers over WebSocket. Viewers derive the elapsed time from the
//! run's start timestamp and their estimated offset to the server clock, and
//! fire color cards and the bell locally.

pub mod api;
pub mod client;
pub mod clock;
pub mod config;
pub mod protocol;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use clock::{SystemClock, TimeSource};
pub use config::{Config, ViewerConfig};
pub use state::{AppState, Phase, TimerSettings, TimerState};
pub use utils::signals::shutdown_signal;
