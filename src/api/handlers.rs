//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::error;

use crate::state::AppState;
use super::responses::{HealthResponse, StatusResponse, VersionInfo};

/// Handle GET /status - Return the current timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let crate::protocol::ServerMessage::State { state: timer, server_time } = match state.current_message() {
        Ok(message) => message,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        state: timer,
        server_time,
        viewers: state.viewer_count(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle GET /version.json - Build identification for the viewer footer
pub async fn version_handler() -> Json<VersionInfo> {
    Json(VersionInfo::from_build_env())
}
