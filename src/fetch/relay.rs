//! Relay fetch: the outbound request path behind the same-origin proxy
//! endpoint.
//!
//! Browsers cannot fetch cross-origin pages directly, so the relay performs
//! the request server-side and hands the body back with permissive CORS
//! headers. The fetch resolver reuses the same path as its fallback transport
//! when a direct attempt fails.

use std::time::Duration;

use url::Url;

use crate::config::{RequestHeaders, RELAY_MAX_BODY_BYTES};
use crate::error_handling::FetchError;

/// Fetches a URL on behalf of a same-origin caller.
///
/// Validates the URL, then tries it as given; an `https://` URL that fails is
/// retried once as `http://` before giving up. The response body is streamed
/// and capped at `RELAY_MAX_BODY_BYTES`; crossing the cap drops the
/// connection immediately rather than draining the rest of the body.
///
/// # Arguments
///
/// * `client` - Shared HTTP client (carries User-Agent and base timeout)
/// * `raw_url` - The URL to fetch, as received from the caller
/// * `timeout` - Per-request time budget, connect through body completion
///
/// # Errors
///
/// * `FetchError::InvalidUrl` - unparseable URL or non-http(s) scheme
/// * `FetchError::Timeout` - the time budget elapsed (terminal; the http
///   fallback is not tried, matching the single abort budget for the request)
/// * `FetchError::PayloadTooLarge` - body exceeded the relay cap
/// * `FetchError::Upstream` - connection or HTTP status failure on the last
///   candidate
pub async fn relay_fetch(
    client: &reqwest::Client,
    raw_url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    let url = Url::parse(raw_url).map_err(|_| FetchError::InvalidUrl(raw_url.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(FetchError::InvalidUrl(raw_url.to_string())),
    }

    let mut candidates = vec![raw_url.to_string()];
    if raw_url.starts_with("https://") {
        candidates.push(raw_url.replacen("https://", "http://", 1));
    }

    let mut last_error = None;
    for candidate in &candidates {
        match fetch_once(client, candidate, timeout).await {
            Ok(body) => return Ok(body),
            // The size cap and the time budget are terminal for the whole
            // relay operation, not per candidate.
            Err(err @ (FetchError::Timeout(_) | FetchError::PayloadTooLarge { .. })) => {
                return Err(err);
            }
            Err(err) => last_error = Some(err),
        }
    }

    Err(last_error.unwrap_or_else(|| FetchError::InvalidUrl(raw_url.to_string())))
}

async fn fetch_once(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, FetchError> {
    let request = RequestHeaders::apply_to_request_builder(client.get(url)).timeout(timeout);

    let response = request.send().await.map_err(|err| {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Upstream(err.to_string())
        }
    })?;

    let status = response.status();
    if !(status.is_success() || status.is_redirection()) {
        return Err(FetchError::Upstream(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }

    read_body_capped(response, RELAY_MAX_BODY_BYTES, timeout).await
}

/// Reads a response body chunk by chunk, bailing out as soon as the size cap
/// is crossed so oversized bodies are never buffered in full.
pub(super) async fn read_body_capped(
    mut response: reqwest::Response,
    cap: usize,
    timeout: Duration,
) -> Result<String, FetchError> {
    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                body.extend_from_slice(&chunk);
                if body.len() > cap {
                    return Err(FetchError::payload_too_large(body.len(), cap));
                }
            }
            Ok(None) => break,
            Err(err) if err.is_timeout() => return Err(FetchError::Timeout(timeout)),
            Err(err) => return Err(FetchError::Upstream(err.to_string())),
        }
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}
