//! Outbound HTTP request headers.
//!
//! Every fetch issued on a user's behalf (direct or relayed) carries the same
//! realistic browser header set to reduce WAF false-positive blocking.

/// Realistic browser request headers to reduce bot detection.
///
/// Modern WAFs and bot-detection systems analyze request headers to identify
/// automated clients. Mimicking a navigating Chrome tab (content negotiation,
/// Sec-Fetch-* metadata, cache directives) keeps fetches of ordinary pages from
/// being blocked outright.
///
/// Note that JA3 TLS fingerprinting will still identify rustls; the header set
/// only addresses header-analysis detection, which is the common case.
pub struct RequestHeaders;

impl RequestHeaders {
    /// Applies the standard request headers to a `reqwest::RequestBuilder`.
    ///
    /// The User-Agent is configured on the client itself (see
    /// `initialization::client`), so it is not repeated here. Accept-Encoding
    /// is negotiated by reqwest based on the enabled compression features.
    pub fn apply_to_request_builder(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-dest"),
                "document",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-mode"),
                "navigate",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-site"),
                "none",
            )
            .header(
                reqwest::header::HeaderName::from_static("sec-fetch-user"),
                "?1",
            )
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_applied_to_builder() {
        let client = reqwest::Client::new();
        let builder = RequestHeaders::apply_to_request_builder(client.get("https://example.com"));
        let request = builder.build().expect("request should build");

        let headers = request.headers();
        assert_eq!(
            headers.get("accept").and_then(|v| v.to_str().ok()),
            Some("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        );
        assert_eq!(
            headers.get("sec-fetch-mode").and_then(|v| v.to_str().ok()),
            Some("navigate")
        );
        assert_eq!(
            headers.get("upgrade-insecure-requests").and_then(|v| v.to_str().ok()),
            Some("1")
        );
    }
}
