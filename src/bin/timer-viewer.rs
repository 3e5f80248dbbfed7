//! Timer Viewer - terminal client for a shared speech timer

use std::sync::Arc;
use tracing::info;

use speech_timer::{
    client::{run_viewer, AlertPlayer, Muted, TerminalBell},
    clock::SystemClock,
    config::ViewerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ViewerConfig::parse();

    // Logs go to stderr so they do not interleave with the clock display
    tracing_subscriber::fmt()
        .with_env_filter(format!("speech_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Connecting to {}", config.url);

    let player: Arc<dyn AlertPlayer> = if config.mute {
        Arc::new(Muted)
    } else {
        Arc::new(TerminalBell)
    };

    run_viewer(&config, player, Arc::new(SystemClock)).await
}
