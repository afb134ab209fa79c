//! `POST /api/preview` - fetch, rewrite, and return a sandboxed page preview.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, info};
use serde_json::json;

use super::{
    now_timestamp, rate_limit_headers, rate_limited_response, read_json_body, validate_url_field,
};
use crate::config::{PREVIEW_MAX_BODY_BYTES, PREVIEW_MAX_REQUESTS};
use crate::normalize::normalize_url;
use crate::rate_limit::RateLimiter;
use crate::rewrite::rewrite_document;
use crate::server::types::{PreviewResponse, UrlRequest};
use crate::server::AppState;

/// Fetches the target page through the resolver, rewrites it into a
/// self-contained document, and returns it for rendering in an isolated
/// frame.
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    let identity = RateLimiter::client_identity(&headers);
    let admission = state.limiter.check(&identity, PREVIEW_MAX_REQUESTS);
    if !admission.success {
        return rate_limited_response(&admission, "preview requests");
    }

    let body: UrlRequest = match read_json_body(request).await {
        Ok(body) => body,
        Err(response) => return response,
    };
    if let Err(response) = validate_url_field(&body.url) {
        return response;
    }

    let target = match normalize_url(&body.url) {
        Ok(target) => target,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid URL format" })),
            )
                .into_response();
        }
    };

    let page = match state.resolver.fetch(&target).await {
        Ok(page) => page,
        Err(err) => {
            error!("Preview fetch for {} failed: {err}", target.display());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to fetch page preview",
                    "details": err.to_string(),
                    "canProxy": true,
                })),
            )
                .into_response();
        }
    };

    let document = rewrite_document(&page.body, &page.final_url, state.resolver.as_ref()).await;

    if document.size() > PREVIEW_MAX_BODY_BYTES {
        let size_mib = document.size() as f64 / 1024.0 / 1024.0;
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(json!({
                "error": format!("Page too large for preview: {size_mib:.2}MB (max 5MB)"),
                "canProxy": true,
            })),
        )
            .into_response();
    }

    info!(
        "Preview for {} rewritten to {}",
        page.final_url,
        document.size_formatted()
    );

    let response = PreviewResponse {
        success: true,
        url: body.url,
        size: document.size(),
        size_formatted: document.size_formatted(),
        content: document.html,
        timestamp: now_timestamp(),
    };

    (StatusCode::OK, rate_limit_headers(&admission), Json(response)).into_response()
}
