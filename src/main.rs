//! Speech Timer - shared speech timer server
//!
//! This is the main entry point for the timer server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use speech_timer::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("speech_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting speech-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, static_dir={:?}",
          config.host, config.port, config.static_dir);

    // The one timer shared by every viewer
    let state = Arc::new(AppState::new(config.port, config.host.clone(), Arc::new(SystemClock)));

    let app = create_router(state, config.static_dir.as_deref());

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /ws           - Viewer WebSocket");
    info!("  GET  /status       - Current timer and server status");
    info!("  GET  /health       - Health check");
    info!("  GET  /version.json - Build information");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
