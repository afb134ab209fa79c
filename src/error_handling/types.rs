//! Error type definitions.
//!
//! The fetch taxonomy maps directly onto HTTP statuses at the endpoint
//! boundary: `InvalidUrl` → 400, `Timeout` → 408, `PayloadTooLarge` → 413,
//! `Exhausted` and `Upstream` → 500. Rewrite failures never surface here at
//! all; the rewriter falls back to the unmodified document instead.

use std::time::Duration;

use log::SetLoggerError;
use thiserror::Error;

use crate::fetch::FetchAttempt;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

/// Error types for URL fetching.
///
/// Raw reqwest errors never cross this boundary; each failure is classified
/// into one of these variants so callers can map it to a response without
/// inspecting transport details.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed, or uses a scheme other than http/https.
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// Every variant × transport combination failed.
    /// Carries the ordered attempt list for diagnostics.
    #[error("All fetch attempts failed. Tried: {summary}")]
    Exhausted {
        /// Ordered description of every attempt, formatted `transport(url): reason`.
        summary: String,
        /// The individual attempts, in the order they were made.
        attempts: Vec<FetchAttempt>,
    },

    /// The request exceeded its time budget. The in-flight I/O is cancelled
    /// when the driving future is dropped.
    #[error("Request timeout ({} seconds)", .0.as_secs())]
    Timeout(Duration),

    /// The response body exceeded the configured size cap.
    #[error("Response too large: {size_mib:.2}MB (max {limit_mib}MB)")]
    PayloadTooLarge {
        /// Observed size, in MiB. When the body is streamed this is the size
        /// at which reading stopped, not the full upstream size.
        size_mib: f64,
        /// The configured cap, in MiB.
        limit_mib: usize,
    },

    /// A single upstream fetch failed (connection, TLS, or HTTP status).
    #[error("Failed to fetch: {0}")]
    Upstream(String),
}

impl FetchError {
    /// Builds an `Exhausted` error from an ordered attempt list.
    pub fn exhausted(attempts: Vec<FetchAttempt>) -> Self {
        let summary = attempts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        FetchError::Exhausted { summary, attempts }
    }

    /// Builds a `PayloadTooLarge` error from byte counts.
    pub fn payload_too_large(size_bytes: usize, limit_bytes: usize) -> Self {
        FetchError::PayloadTooLarge {
            size_mib: size_bytes as f64 / 1024.0 / 1024.0,
            limit_mib: limit_bytes / 1024 / 1024,
        }
    }
}
