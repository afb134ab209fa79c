//! `GET /api/proxy` - the same-origin relay endpoint.
//!
//! Performs the outbound fetch server-side and returns the body with
//! permissive cross-origin-read headers, so the browser-side fallback path is
//! never blocked by cross-origin restrictions.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::{rate_limit_headers, rate_limited_response};
use crate::config::{FETCH_TIMEOUT, PROXY_MAX_REQUESTS};
use crate::error_handling::FetchError;
use crate::fetch::relay::relay_fetch;
use crate::rate_limit::RateLimiter;
use crate::server::AppState;

/// Query parameters for the relay endpoint.
#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    /// The URL to fetch on the caller's behalf.
    pub url: Option<String>,
}

fn cors_headers() -> [(header::HeaderName, HeaderValue); 3] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ),
    ]
}

/// Fetches the `url` query parameter and returns the raw body as HTML.
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ProxyParams>,
) -> Response {
    let identity = RateLimiter::client_identity(&headers);
    let admission = state.limiter.check(&identity, PROXY_MAX_REQUESTS);
    if !admission.success {
        return rate_limited_response(&admission, "requests");
    }

    let Some(url) = params.url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing URL parameter" })),
        )
            .into_response();
    };

    // Validate before fetching so scheme problems surface as 400, not as a
    // failed upstream attempt.
    let parsed = match Url::parse(&url) {
        Ok(parsed) => parsed,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid URL format" })),
            )
                .into_response();
        }
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Only HTTP/HTTPS URLs are allowed" })),
        )
            .into_response();
    }

    match relay_fetch(&state.client, &url, FETCH_TIMEOUT).await {
        Ok(html) => {
            let mut response_headers = rate_limit_headers(&admission);
            response_headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            response_headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store, must-revalidate"),
            );
            for (name, value) in cors_headers() {
                response_headers.insert(name, value);
            }
            (StatusCode::OK, response_headers, html).into_response()
        }
        Err(err @ FetchError::Timeout(_)) => (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(err @ FetchError::PayloadTooLarge { .. }) => (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(err) => {
            error!("Relay fetch for {url} failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to fetch URL",
                    "details": err.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Answers the CORS preflight for the relay endpoint.
pub async fn preflight() -> Response {
    let mut headers = HeaderMap::new();
    for (name, value) in cors_headers() {
        headers.insert(name, value);
    }
    (StatusCode::OK, headers).into_response()
}
