//! State management module
//!
//! This module contains the timer state record, the store that owns its
//! transitions, and the shared server state wrapping that store.

pub mod app_state;
pub mod store;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use store::{ApplyOutcome, TimerAction, TimerStateStore};
pub use timer_state::{Phase, TimerSettings, TimerState};
