//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// Server CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "speech-timer")]
#[command(about = "A shared speech timer server that keeps every viewer in sync")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Directory of static viewer assets to serve
    #[arg(short, long)]
    pub static_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

/// Terminal viewer CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "timer-viewer")]
#[command(about = "Terminal viewer for a shared speech timer")]
#[command(version)]
pub struct ViewerConfig {
    /// WebSocket URL of the timer server
    #[arg(short, long, default_value = "ws://127.0.0.1:3000/ws")]
    pub url: String,

    /// Display refresh interval in milliseconds
    #[arg(long, default_value = "100")]
    pub tick_ms: u64,

    /// Delay before reconnecting after the connection drops, in milliseconds
    #[arg(long, default_value = "1000")]
    pub reconnect_ms: u64,

    /// Do not ring the terminal bell
    #[arg(long)]
    pub mute: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ViewerConfig {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_ms)
    }

    pub fn log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

fn log_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}
