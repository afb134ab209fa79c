//! Request handlers and shared handler plumbing.

pub mod analyze;
pub mod preview;
pub mod proxy;
pub mod screenshot;

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::{BODY_PARSE_TIMEOUT, MAX_REQUEST_BODY_BYTES, MAX_URL_LENGTH};
use crate::rate_limit::Admission;

/// RFC 3339 timestamp with millisecond precision.
pub(super) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The `X-RateLimit-*` header set attached to every rate-limited response,
/// allowed or denied.
pub(super) fn rate_limit_headers(admission: &Admission) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from(admission.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(admission.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(admission.reset));
    headers
}

/// Seconds until the window resets, rounded up, never negative.
pub(super) fn retry_after_secs(admission: &Admission) -> i64 {
    let remaining_ms = admission.reset - Utc::now().timestamp_millis();
    (remaining_ms.max(0) + 999) / 1000
}

/// Builds the 429 response for a denied request.
pub(super) fn rate_limited_response(admission: &Admission, what: &str) -> Response {
    let retry_after = retry_after_secs(admission);
    let mut headers = rate_limit_headers(admission);
    headers.insert("retry-after", HeaderValue::from(retry_after));

    (
        StatusCode::TOO_MANY_REQUESTS,
        headers,
        Json(json!({
            "error": "Rate limit exceeded",
            "message": format!(
                "Too many {what}. Please try again in {retry_after} seconds."
            ),
        })),
    )
        .into_response()
}

/// Reads and parses a JSON request body under the body-parse timeout.
///
/// Failures (oversized body, malformed JSON, or a client trickling bytes past
/// the timeout) come back as a ready-made 400 response.
pub(super) async fn read_json_body<T: DeserializeOwned>(request: Request) -> Result<T, Response> {
    let body = request.into_body();
    let collected = tokio::time::timeout(
        BODY_PARSE_TIMEOUT,
        axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES),
    )
    .await;

    let bytes = match collected {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(_)) => return Err(invalid_request("Request body too large")),
        Err(_) => return Err(invalid_request("Request body timeout")),
    };

    serde_json::from_slice(&bytes).map_err(|_| invalid_request("Request body must be JSON"))
}

/// Validates the `url` field shared by the POST endpoints: present and at
/// most `MAX_URL_LENGTH` characters.
pub(super) fn validate_url_field(url: &str) -> Result<(), Response> {
    if url.trim().is_empty() {
        return Err(invalid_request("URL is required"));
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(invalid_request("URL too long"));
    }
    Ok(())
}

/// A 400 response with the standard invalid-request shape.
pub(super) fn invalid_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "Invalid request",
            "message": message,
        })),
    )
        .into_response()
}

/// JSON 405 for non-POST requests against the POST endpoints.
pub(super) async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Method not allowed",
            "message": "Use POST method",
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_field_rejects_empty_and_oversized() {
        assert!(validate_url_field("").is_err());
        assert!(validate_url_field("   ").is_err());
        assert!(validate_url_field(&"a".repeat(MAX_URL_LENGTH + 1)).is_err());
        assert!(validate_url_field("https://example.com").is_ok());
    }

    #[test]
    fn test_retry_after_rounds_up_and_clamps() {
        let future = Admission {
            success: false,
            limit: 10,
            remaining: 0,
            reset: Utc::now().timestamp_millis() + 1500,
        };
        let secs = retry_after_secs(&future);
        assert!((1..=3).contains(&secs));

        let past = Admission {
            success: false,
            limit: 10,
            remaining: 0,
            reset: Utc::now().timestamp_millis() - 5000,
        };
        assert_eq!(retry_after_secs(&past), 0);
    }

    #[test]
    fn test_rate_limit_headers_present() {
        let admission = Admission {
            success: true,
            limit: 10,
            remaining: 7,
            reset: 1_700_000_000_000,
        };
        let headers = rate_limit_headers(&admission);
        assert_eq!(headers.get("x-ratelimit-limit").unwrap(), "10");
        assert_eq!(headers.get("x-ratelimit-remaining").unwrap(), "7");
        assert_eq!(headers.get("x-ratelimit-reset").unwrap(), "1700000000000");
    }
}
