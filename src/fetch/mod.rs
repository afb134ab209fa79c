//! URL fetching with transport and protocol fallback.
//!
//! The resolver never raises a raw network error: every failure is recorded
//! as a [`FetchAttempt`] and the caller either gets a body or one
//! `FetchError::Exhausted` describing everything that was tried.

mod attempt;
pub mod relay;

pub use attempt::{FetchAttempt, Transport};

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::config::{RequestHeaders, FETCH_TIMEOUT};
use crate::error_handling::FetchError;
use crate::normalize::{normalize_url, TargetUrl};

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    /// The response body, decoded as text.
    pub body: String,
    /// The final effective URL the body came from. For direct fetches this is
    /// the post-redirect URL; for relayed fetches it is the attempted variant.
    pub final_url: String,
}

/// Fetches text content for an absolute URL.
///
/// This is the seam between the content rewriter and the network: the
/// rewriter pulls stylesheets through it, and tests substitute a mock.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetches the given URL and returns its body as text.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Resolves page content despite network-, TLS-, or WAF-level failures.
///
/// Stateless between calls; cheap to clone via the shared client.
#[derive(Clone)]
pub struct Resolver {
    client: Arc<reqwest::Client>,
}

impl Resolver {
    /// Creates a resolver around a shared HTTP client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Resolver { client }
    }

    /// The ordered protocol variants to try for a target.
    ///
    /// Scheme-less input tries `https` then `http`. An explicit scheme is
    /// honored first, with the opposite scheme as fallback.
    pub fn variants(target: &TargetUrl) -> Vec<String> {
        let url = target.as_str();
        if target.explicit_scheme() {
            let opposite = if url.starts_with("https://") {
                url.replacen("https://", "http://", 1)
            } else {
                url.replacen("http://", "https://", 1)
            };
            vec![url.to_string(), opposite]
        } else {
            // The normalizer already prefixed https; derive the http twin.
            vec![url.to_string(), url.replacen("https://", "http://", 1)]
        }
    }

    /// Fetches the target, walking the variant × transport matrix in order:
    /// for each protocol variant, transport `direct` then transport `relay`.
    /// The first success wins and nothing further is attempted.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Exhausted` with the ordered attempt list when
    /// every combination failed.
    pub async fn fetch(&self, target: &TargetUrl) -> Result<ResolvedPage, FetchError> {
        let mut attempts = Vec::new();

        for variant in Self::variants(target) {
            debug!("Trying direct fetch for {variant}");
            match self.try_direct(&variant).await {
                Ok(page) => return Ok(page),
                Err(reason) => {
                    attempts.push(FetchAttempt::failure(&variant, Transport::Direct, reason));
                }
            }

            debug!("Direct fetch failed, trying relay for {variant}");
            match relay::relay_fetch(&self.client, &variant, FETCH_TIMEOUT).await {
                Ok(body) => {
                    return Ok(ResolvedPage {
                        body,
                        final_url: variant,
                    });
                }
                Err(err) => {
                    attempts.push(FetchAttempt::failure(
                        &variant,
                        Transport::Relay,
                        err.to_string(),
                    ));
                }
            }
        }

        Err(FetchError::exhausted(attempts))
    }

    async fn try_direct(&self, url: &str) -> Result<ResolvedPage, String> {
        let request = RequestHeaders::apply_to_request_builder(self.client.get(url));

        let response = request
            .send()
            .await
            .map_err(|err| format!("direct fetch error: {err}"))?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(format!(
                "direct fetch failed: HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|err| format!("direct fetch error: {err}"))?;

        Ok(ResolvedPage { body, final_url })
    }
}

#[async_trait]
impl ContentFetcher for Resolver {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let target = normalize_url(url)?;
        let page = self.fetch(&target).await?;
        Ok(page.body)
    }
}
