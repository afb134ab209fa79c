//! Request and response body types for the HTTP API.

use serde::{Deserialize, Serialize};

/// JSON request body carrying a URL, shared by the POST endpoints.
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    /// The URL to operate on. Validated for presence and length per endpoint.
    #[serde(default)]
    pub url: String,
}

/// Successful preview response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// Always true for this shape; failures use an error body instead.
    pub success: bool,
    /// The URL as the user submitted it.
    pub url: String,
    /// The rewritten, self-contained HTML document.
    pub content: String,
    /// Document size in bytes.
    pub size: usize,
    /// Human-readable document size.
    pub size_formatted: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// Screenshot response. The capture capability is permanently disabled, so
/// `success` is always false and callers fall back to the live preview.
#[derive(Debug, Serialize)]
pub struct ScreenshotResponse {
    /// Always false; the capability is a deliberate stub.
    pub success: bool,
    /// Why no screenshot is available.
    pub error: String,
    /// Encoding the screenshot would use if the capability existed.
    pub format: &'static str,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}
