//! URL validation and normalization.
//!
//! Every URL entering the system passes through [`normalize_url`] before any
//! network activity happens. Downstream code never sees a raw user string.

use url::Url;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::FetchError;

/// A validated, fully-qualified target URL.
///
/// Constructed only through [`normalize_url`]; immutable once created. The
/// scheme is guaranteed to be `http` or `https`.
#[derive(Debug, Clone)]
pub struct TargetUrl {
    url: Url,
    display: String,
    explicit_scheme: bool,
}

impl TargetUrl {
    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The normalized URL as a string.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The string as the user typed it, for user-facing echo.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Whether the input carried an explicit `http://`/`https://` prefix.
    ///
    /// The fetch resolver uses this to order its protocol variants: explicit
    /// schemes are honored first, scheme-less input starts from https.
    pub fn explicit_scheme(&self) -> bool {
        self.explicit_scheme
    }
}

/// Validates and normalizes a raw URL string.
///
/// Adds an `https://` prefix if the input has no explicit scheme, then parses
/// and validates that the result uses http or https. Input longer than
/// `MAX_URL_LENGTH` is rejected before parsing.
///
/// # Arguments
///
/// * `raw` - The URL string as submitted by the user
///
/// # Errors
///
/// Returns `FetchError::InvalidUrl` if the input is empty, too long, fails to
/// parse, or uses an unsupported scheme.
pub fn normalize_url(raw: &str) -> Result<TargetUrl, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl("URL is required".to_string()));
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(FetchError::InvalidUrl(format!(
            "URL too long ({} > {} characters)",
            trimmed.len(),
            MAX_URL_LENGTH
        )));
    }

    let explicit_scheme = has_http_prefix(trimmed);
    if !explicit_scheme {
        // Anything else of the form `scheme://` is an unsupported scheme, not
        // a host name missing its prefix. Without this check, prepending would
        // turn `ftp://x` into a parseable https URL with host "ftp".
        if let Some((scheme, _)) = trimmed.split_once("://") {
            return Err(FetchError::InvalidUrl(format!(
                "Unsupported scheme '{scheme}' (only http and https are allowed)"
            )));
        }
    }
    let candidate = if explicit_scheme {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .map_err(|_| FetchError::InvalidUrl(trimmed.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(FetchError::InvalidUrl(trimmed.to_string())),
    }

    if url.host_str().is_none() {
        return Err(FetchError::InvalidUrl(trimmed.to_string()));
    }

    Ok(TargetUrl {
        url,
        display: trimmed.to_string(),
        explicit_scheme,
    })
}

fn has_http_prefix(input: &str) -> bool {
    let lower_prefix = input
        .get(..8)
        .or_else(|| input.get(..7))
        .unwrap_or(input)
        .to_ascii_lowercase();
    lower_prefix.starts_with("http://") || lower_prefix.starts_with("https://")
}
