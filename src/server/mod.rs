//! Static hosting for the built web bundle plus an `/api` reverse proxy.
//!
//! The console itself is a pile of static files; everything dynamic lives
//! in the platform backend. This server exists so a single container can
//! host the bundle and forward `/api` to wherever the backend runs,
//! keeping the browser on one origin.

pub mod proxy;

use std::net::SocketAddr;

use anyhow::Result;
use axum::routing::{any, get};
use axum::{Json, Router};
use serde::Serialize;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Pooled client used for every proxied request.
    pub http: reqwest::Client,
    /// Proxy target origin, trailing slash trimmed. `None` disables the proxy.
    pub backend: Option<String>,
}

/// General status response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub git_sha: &'static str,
}

/// GET /healthz - Service health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "pix-console",
        version: env!("PIXC_VERSION"),
        git_sha: env!("PIXC_GIT_SHA"),
    })
}

/// Assemble the full service: health probe, the `/api` proxy, and static
/// files with an index.html fallback so client-side routes survive a full
/// page load.
pub fn router(state: AppState, static_dir: &str) -> Router {
    let index = std::path::Path::new(static_dir).join("index.html");
    let static_files = ServeDir::new(static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/{*rest}", any(proxy::forward))
        .fallback_service(static_files)
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let state = AppState {
        http: reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?,
        backend: config
            .backend_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string()),
    };

    match &state.backend {
        Some(backend) => tracing::info!("Proxying /api to {}", backend),
        None => tracing::warn!("No backend_url configured; /api requests will answer 502"),
    }

    let app = router(state, &config.static_dir);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn proxyless_state() -> AppState {
        AppState {
            http: reqwest::Client::new(),
            backend: None,
        }
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        String::from_utf8_lossy(&bytes).to_string()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = router(proxyless_state(), dir.path().to_str().expect("utf8 path"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#""status":"ok""#));
        assert!(body.contains(r#""service":"pix-console""#));
    }

    #[tokio::test]
    async fn api_without_a_backend_answers_502_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = router(proxyless_state(), dir.path().to_str().expect("utf8 path"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/transactions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(body_string(response).await.contains("error"));
    }

    #[tokio::test]
    async fn client_routes_fall_back_to_the_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("index.html"),
            "<!DOCTYPE html><title>PIX Console</title>",
        )
        .expect("write index");
        std::fs::write(dir.path().join("app.css"), "body{}").expect("write asset");
        let app = router(proxyless_state(), dir.path().to_str().expect("utf8 path"));

        // Real files are served as-is.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/app.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "body{}");

        // Client-side routes get the index so the router can take over.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/transactions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("PIX Console"));
    }
}
