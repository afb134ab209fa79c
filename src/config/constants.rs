//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including timeouts, size limits, and rate-limiting parameters.

use std::time::Duration;

/// Maximum accepted length for a submitted URL, in characters.
/// Longer input is rejected before any parsing or network activity happens.
pub const MAX_URL_LENGTH: usize = 2000;

// Nested timeout budget. Each layer is tighter than the one outside it so a
// slow upstream fails at the innermost boundary first:
// body parse (5s) < analysis (25s) < fetch attempt (30s).
/// Timeout for reading and parsing a JSON request body.
pub const BODY_PARSE_TIMEOUT: Duration = Duration::from_secs(5);
/// End-to-end timeout for one URL analysis.
pub const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(25);
/// Timeout for a single outbound fetch attempt (direct or relay).
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// Response body size limits
/// Maximum response body size accepted by the relay endpoint (10 MiB).
/// Bodies are streamed and the connection is dropped as soon as the cap is crossed.
pub const RELAY_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
/// Maximum size of a rewritten preview document (5 MiB).
/// Tighter than the relay cap so previews stay responsive.
pub const PREVIEW_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Maximum size of an incoming JSON request body. Requests only ever carry a
/// URL, so anything beyond this is garbage.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

// Rate limiting
/// Length of one rate-limit window.
pub const RATE_LIMIT_INTERVAL: Duration = Duration::from_secs(60);
/// Maximum number of client identities tracked at once.
/// The store evicts beyond this, so it cannot grow unbounded under IP churn.
pub const RATE_LIMIT_MAX_IDENTITIES: usize = 500;
/// Per-window request ceiling for the analyze endpoint.
pub const ANALYZE_MAX_REQUESTS: u32 = 10;
/// Per-window request ceiling for the preview endpoint.
pub const PREVIEW_MAX_REQUESTS: u32 = 15;
/// Per-window request ceiling for the screenshot endpoint.
pub const SCREENSHOT_MAX_REQUESTS: u32 = 5;
/// Per-window request ceiling for the relay (proxy) endpoint.
pub const PROXY_MAX_REQUESTS: u32 = 10;

/// Identity used for requests that carry no forwarded-IP header.
/// All unattributable clients share one bucket.
pub const FALLBACK_CLIENT_IDENTITY: &str = "unknown";

/// Default User-Agent string for outbound HTTP requests.
///
/// Mimics a current Chrome build so header-analysis WAF rules are less likely
/// to block the fetch. Users can override it via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
