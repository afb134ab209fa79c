//! `POST /api/analyze` - heuristic URL safety analysis.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;

use super::{rate_limit_headers, rate_limited_response, read_json_body, validate_url_field};
use crate::analyzer::analyze_url;
use crate::config::{ANALYSIS_TIMEOUT, ANALYZE_MAX_REQUESTS};
use crate::rate_limit::RateLimiter;
use crate::server::types::UrlRequest;
use crate::server::AppState;

/// Analyzes a URL and returns the weighted check report.
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    let identity = RateLimiter::client_identity(&headers);
    let admission = state.limiter.check(&identity, ANALYZE_MAX_REQUESTS);
    if !admission.success {
        return rate_limited_response(&admission, "requests");
    }

    let body: UrlRequest = match read_json_body(request).await {
        Ok(body) => body,
        Err(response) => return response,
    };
    if let Err(response) = validate_url_field(&body.url) {
        return response;
    }

    // The analysis is a pure function today, but it sits under the same time
    // budget as the rest of the pipeline so future network-backed checks
    // cannot stall the endpoint.
    let analysis =
        tokio::time::timeout(ANALYSIS_TIMEOUT, async { analyze_url(&body.url) }).await;

    match analysis {
        Ok(analysis) => {
            (StatusCode::OK, rate_limit_headers(&admission), Json(analysis)).into_response()
        }
        Err(_) => {
            error!("Analysis of {} timed out", body.url);
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "message": "An error occurred while analyzing the URL",
        })),
    )
        .into_response()
}
