//! Viewer side of the timer
//!
//! This module mirrors the server's state on a viewer, evaluates card and
//! bell thresholds, plays alerts and keeps the connection to the server
//! alive.

pub mod alert;
pub mod connection;
pub mod display;
pub mod evaluator;
pub mod input;
pub mod sync;
pub mod viewer;

// Re-export main types
pub use alert::{AlertPlayer, BellRepeater, Muted, TerminalBell};
pub use evaluator::{evaluate, AlertFlags, CardColor, Evaluation, ThresholdEvent};
pub use sync::{clock_offset, ClientEffect, SyncClient};
pub use viewer::{run_viewer, Viewer};
