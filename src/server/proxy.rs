//! Reverse proxy for `/api` requests.
//!
//! Forwards the request as-is (method, headers, body) to the configured
//! backend, with the `/api` prefix stripped so the backend's own base
//! path is whatever `backend_url` says. Hop-by-hop headers are dropped in
//! both directions.

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::AppState;

/// Proxied request bodies are small JSON; anything bigger is suspect.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Headers that describe the connection rather than the payload, plus
/// `host` (reqwest sets its own) and `content-length` (recomputed).
const STRIPPED_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// Join the backend origin with the request path, minus the `/api` prefix.
/// The query string is preserved.
pub fn proxy_target(backend: &str, path_and_query: &str) -> String {
    let rest = path_and_query
        .strip_prefix("/api")
        .unwrap_or(path_and_query);
    format!("{}{}", backend, rest)
}

/// Drop headers a proxy must not forward.
pub fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = headers.clone();
    for name in STRIPPED_HEADERS {
        filtered.remove(*name);
    }
    filtered
}

/// ANY /api/{*rest} - forward to the platform backend.
pub async fn forward(State(state): State<AppState>, req: Request) -> Response {
    let Some(backend) = state.backend.clone() else {
        return error_response(
            StatusCode::BAD_GATEWAY,
            "No backend configured for /api requests".to_string(),
        );
    };

    let method = req.method().clone();
    let headers = filter_headers(req.headers());
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let target = proxy_target(&backend, &path_and_query);

    let body = match to_bytes(req.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("Request body unreadable: {}", e),
            );
        }
    };

    let upstream = state
        .http
        .request(method, &target)
        .headers(headers)
        .body(body)
        .send()
        .await;

    let upstream = match upstream {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!("Proxy request to {} failed: {}", target, e);
            return error_response(
                StatusCode::BAD_GATEWAY,
                format!("Backend unreachable: {}", e),
            );
        }
    };

    let status = upstream.status();
    let response_headers = filter_headers(upstream.headers());
    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Proxy response from {} truncated: {}", target, e);
            return error_response(
                StatusCode::BAD_GATEWAY,
                format!("Backend response unreadable: {}", e),
            );
        }
    };

    let mut response = Response::builder().status(status);
    if let Some(headers) = response.headers_mut() {
        *headers = response_headers;
    }
    response
        .body(axum::body::Body::from(bytes))
        .unwrap_or_else(|e| {
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Backend response could not be relayed: {}", e),
            )
        })
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{AUTHORIZATION, CONNECTION, CONTENT_LENGTH, HOST};

    #[test]
    fn target_strips_the_api_prefix() {
        assert_eq!(
            proxy_target("https://backend.internal", "/api/transactions"),
            "https://backend.internal/transactions"
        );
    }

    #[test]
    fn target_keeps_the_query_string() {
        assert_eq!(
            proxy_target(
                "https://backend.internal",
                "/api/withdrawals/calculate?amount_cents=5000"
            ),
            "https://backend.internal/withdrawals/calculate?amount_cents=5000"
        );
    }

    #[test]
    fn target_respects_a_backend_base_path() {
        assert_eq!(
            proxy_target("https://pix.example/v1", "/api/transfers"),
            "https://pix.example/v1/transfers"
        );
    }

    #[test]
    fn connection_headers_are_dropped_but_auth_survives() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer token".parse().unwrap());
        headers.insert(CONNECTION, "keep-alive".parse().unwrap());
        headers.insert(HOST, "console.local".parse().unwrap());
        headers.insert(CONTENT_LENGTH, "42".parse().unwrap());

        let filtered = filter_headers(&headers);

        assert!(filtered.contains_key(AUTHORIZATION));
        assert!(!filtered.contains_key(CONNECTION));
        assert!(!filtered.contains_key(HOST));
        assert!(!filtered.contains_key(CONTENT_LENGTH));
    }
}
