//! HTTP and WebSocket API module
//!
//! This module contains the endpoint handlers, the viewer socket and the
//! response structures.

pub mod handlers;
pub mod responses;
pub mod ws;

use std::{path::Path, sync::Arc};
use axum::{
    extract::{ws::WebSocketUpgrade, Request, State},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;
use ws::{root_handler, ws_handler};

/// Create the router with all endpoints, optionally serving static assets
pub fn create_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    // Browser viewers open their socket on the page's own host, path `/`
    let assets = static_dir.map(ServeDir::new);
    let root = get(
        move |ws: Option<WebSocketUpgrade>, State(state): State<Arc<AppState>>, request: Request| {
            root_handler(ws, state, assets.clone(), request)
        },
    );

    let router = Router::new()
        .route("/", root)
        .route("/ws", get(ws_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/version.json", get(version_handler));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{
        api::responses::{StatusResponse, VersionInfo},
        clock::ManualClock,
        state::{Phase, TimerAction, TimerSettings},
    };

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            3000,
            "127.0.0.1".to_string(),
            Arc::new(ManualClock::new(1_000_000)),
        ))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get_json(create_router(test_state(), None), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn status_reports_current_timer() {
        let state = test_state();
        state.apply(&TimerAction::Start(TimerSettings::new(5, 6, 7, 8))).unwrap();

        let (status, body) = get_json(create_router(state, None), "/status").await;
        assert_eq!(status, StatusCode::OK);

        let report: StatusResponse = serde_json::from_value(body).unwrap();
        assert_eq!(report.state.phase, Phase::Running);
        assert_eq!(report.state.start_time, Some(1_000_000));
        assert_eq!(report.server_time, 1_000_000);
        assert_eq!(report.viewers, 0);
        assert_eq!(report.last_action.as_deref(), Some("start"));
    }

    #[tokio::test]
    async fn version_has_commit_and_date() {
        let (status, body) = get_json(create_router(test_state(), None), "/version.json").await;
        assert_eq!(status, StatusCode::OK);
        let version: VersionInfo = serde_json::from_value(body).unwrap();
        assert!(!version.commit.is_empty());
        assert!(!version.date.is_empty());
    }

    #[tokio::test]
    async fn root_serves_static_index_without_upgrade() {
        let dir = std::env::temp_dir().join(format!("speech-timer-index-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<h1>timer</h1>").unwrap();

        let response = create_router(test_state(), Some(&dir))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>timer</h1>");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn root_without_upgrade_or_static_dir_is_404() {
        let response = create_router(test_state(), None)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_route_without_static_dir_is_404() {
        let response = create_router(test_state(), None)
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
