// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The /proxy route: fetch a remote document on behalf of the caller and
// stream it back.
//
// The handler never buffers the upstream body (bytes are piped into the
// response as they arrive, so arbitrarily large documents are relayed with
// bounded memory) and never parses it, so there is nothing to transcode or
// re-encode.  The upstream `Content-Type` is forwarded verbatim.  Upstream
// failure details are logged here and never leaked to the caller.

use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use abdruck_core::error::AbdruckError;
use abdruck_core::types::TargetUrl;

/// Fallback content type when the upstream response carries none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Shared state for the proxy router.
#[derive(Clone)]
pub struct ProxyState {
    /// Outbound HTTP client, shared across requests.
    http: reqwest::Client,
}

impl ProxyState {
    /// Build the outbound client.
    ///
    /// Only the connection phase is bounded by `connect_timeout`; a
    /// whole-request timeout would cut off long document streams.
    pub fn new(connect_timeout: Duration) -> abdruck_core::error::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AbdruckError::RelayServer(format!("build outbound client: {e}")))?;
        Ok(Self { http })
    }
}

/// Create the relay router.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/proxy", get(relay_document))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Errors a relay request can fail with.
///
/// `Upstream` carries the full detail for the server log; its response body
/// is always the same generic message.
#[derive(Debug, Error)]
enum RelayError {
    #[error("URL parameter is required")]
    MissingUrl,

    #[error("URL parameter must be an absolute URL")]
    InvalidUrl,

    #[error("upstream fetch failed: {0}")]
    Upstream(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RelayError::MissingUrl => (StatusCode::BAD_REQUEST, "URL parameter is required"),
            RelayError::InvalidUrl => {
                (StatusCode::BAD_REQUEST, "URL parameter must be an absolute URL")
            }
            RelayError::Upstream(detail) => {
                tracing::error!(error = %detail, "proxy fetch failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch document")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ProxyQuery {
    url: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handle `GET /proxy?url=<absolute-URL>`.
async fn relay_document(
    State(state): State<ProxyState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, RelayError> {
    // Validate before any outbound I/O.
    let raw = query.url.ok_or(RelayError::MissingUrl)?;
    let target = TargetUrl::parse(&raw).map_err(|e| match e {
        AbdruckError::MissingUrl => RelayError::MissingUrl,
        _ => RelayError::InvalidUrl,
    })?;

    debug!(target = %target, "relaying document");

    let upstream = state
        .http
        .get(target.as_str())
        .send()
        .await
        .map_err(|e| RelayError::Upstream(format!("{target}: {e}")))?;

    let status = upstream.status();
    if !status.is_success() {
        return Err(RelayError::Upstream(format!(
            "{target}: upstream status {status}"
        )));
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_owned();

    info!(target = %target, content_type = %content_type, "upstream stream opened");

    // Mid-stream errors abort the response; dropping the reqwest response
    // closes the outbound connection.
    let stream = upstream
        .bytes_stream()
        .inspect_err(|e| warn!(error = %e, "upstream stream error"));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(stream))
        .map_err(|e| RelayError::Upstream(format!("assemble response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use axum::body::to_bytes;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = ProxyState::new(Duration::from_secs(5)).expect("build outbound client");
        router(state)
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("infallible router call")
    }

    async fn body_bytes(response: Response) -> bytes::Bytes {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("collect body")
    }

    fn proxy_uri(target: &str) -> String {
        format!("/proxy?url={}", urlencoding::encode(target))
    }

    #[tokio::test]
    async fn missing_url_is_bad_request() {
        let response = get(test_router(), "/proxy").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_bytes(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["error"], "URL parameter is required");
    }

    #[tokio::test]
    async fn empty_url_is_bad_request() {
        let response = get(test_router(), "/proxy?url=").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_bytes(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["error"], "URL parameter is required");
    }

    #[tokio::test]
    async fn malformed_url_is_bad_request() {
        let response = get(test_router(), "/proxy?url=not-a-url").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_bytes(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["error"], "URL parameter must be an absolute URL");
    }

    #[tokio::test]
    async fn forwards_content_type_and_body_verbatim() {
        let mut upstream = mockito::Server::new_async().await;
        let document = b"%PDF-1.4 relay fidelity";
        let mock = upstream
            .mock("GET", "/doc.pdf")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(document.as_slice())
            .create_async()
            .await;

        let target = format!("{}/doc.pdf", upstream.url());
        let response = get(test_router(), &proxy_uri(&target)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/pdf")
        );
        assert_eq!(body_bytes(response).await.as_ref(), document.as_slice());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn relays_empty_body() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("GET", "/empty")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("")
            .create_async()
            .await;

        let target = format!("{}/empty", upstream.url());
        let response = get(test_router(), &proxy_uri(&target)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn relays_chunked_body_byte_identical() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("GET", "/chunked")
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_chunked_body(|w| {
                w.write_all(b"first chunk|")?;
                w.write_all(b"second chunk|")?;
                w.write_all(b"third chunk")
            })
            .create_async()
            .await;

        let target = format!("{}/chunked", upstream.url());
        let response = get(test_router(), &proxy_uri(&target)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_bytes(response).await.as_ref(),
            b"first chunk|second chunk|third chunk".as_slice()
        );
    }

    #[tokio::test]
    async fn missing_upstream_content_type_falls_back() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("GET", "/untyped")
            .with_status(200)
            .with_body("raw")
            .create_async()
            .await;

        let target = format!("{}/untyped", upstream.url());
        let response = get(test_router(), &proxy_uri(&target)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some(DEFAULT_CONTENT_TYPE)
        );
    }

    #[tokio::test]
    async fn upstream_error_status_is_generic_server_error() {
        let mut upstream = mockito::Server::new_async().await;
        upstream
            .mock("GET", "/missing.pdf")
            .with_status(404)
            .with_body("the upstream error body must never be forwarded")
            .create_async()
            .await;

        let target = format!("{}/missing.pdf", upstream.url());
        let response = get(test_router(), &proxy_uri(&target)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_bytes(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["error"], "Failed to fetch document");
        assert!(!String::from_utf8_lossy(&body).contains("upstream error body"));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_generic_server_error() {
        // Port 9 (discard) on localhost is assumed closed.
        let response = get(test_router(), &proxy_uri("http://127.0.0.1:9/doc.pdf")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_bytes(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["error"], "Failed to fetch document");
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let response = get(test_router(), "/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_bytes(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["status"], "ok");
    }
}
