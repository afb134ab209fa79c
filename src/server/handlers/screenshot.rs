//! `POST /api/screenshot` - permanently stubbed screenshot capture.
//!
//! The capture capability is disabled by design: the live sandboxed preview
//! is the supported rendering path, and callers treat the static failure
//! response as a permanent fallback signal. This handler must keep returning
//! the literal stub rather than growing an implementation.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use url::Url;

use super::{
    now_timestamp, rate_limit_headers, rate_limited_response, read_json_body, validate_url_field,
};
use crate::config::SCREENSHOT_MAX_REQUESTS;
use crate::rate_limit::RateLimiter;
use crate::server::types::{ScreenshotResponse, UrlRequest};
use crate::server::AppState;

/// Validates the request, then reports the capture capability as unavailable.
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    let identity = RateLimiter::client_identity(&headers);
    let admission = state.limiter.check(&identity, SCREENSHOT_MAX_REQUESTS);
    if !admission.success {
        return rate_limited_response(&admission, "screenshot requests");
    }

    let body: UrlRequest = match read_json_body(request).await {
        Ok(body) => body,
        Err(response) => return response,
    };
    if let Err(response) = validate_url_field(&body.url) {
        return response;
    }

    // Screenshots require an already-absolute http(s) URL; there is no
    // normalization step on this endpoint.
    let can_capture = Url::parse(&body.url)
        .map(|url| url.scheme() == "http" || url.scheme() == "https")
        .unwrap_or(false);
    if !can_capture {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Invalid URL",
                "message": "URL must use HTTP or HTTPS protocol",
            })),
        )
            .into_response();
    }

    let response = ScreenshotResponse {
        success: false,
        error: "Screenshot service disabled - using live preview".to_string(),
        format: "base64",
        timestamp: now_timestamp(),
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        rate_limit_headers(&admission),
        Json(response),
    )
        .into_response()
}
