//! Utility functions module
//!
//! This module contains utility functions shared by the server and the viewer.

pub mod signals;

// Re-export main functions
pub use signals::shutdown_signal;
