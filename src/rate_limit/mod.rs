//! Per-identity request admission (rate limiting).
//!
//! Every endpoint checks the gate before doing any work. Identities are
//! derived from forwarded-IP headers; clients with no attributable address
//! all share one fallback bucket.

mod store;

pub use store::Admission;

use axum::http::HeaderMap;

use crate::config::{FALLBACK_CLIENT_IDENTITY, RATE_LIMIT_INTERVAL, RATE_LIMIT_MAX_IDENTITIES};

/// Sliding-window rate limiter over a bounded identity store.
///
/// Injected into handlers as shared state rather than living in a module
/// global, so tests can construct isolated instances.
pub struct RateLimiter {
    store: store::AdmissionStore,
}

impl RateLimiter {
    /// Creates a limiter with the standard capacity bound and window length.
    pub fn new() -> Self {
        RateLimiter {
            store: store::AdmissionStore::new(RATE_LIMIT_MAX_IDENTITIES),
        }
    }

    /// Records a request from `identity` against the given per-window
    /// ceiling, and decides whether to admit it.
    pub fn check(&self, identity: &str, max_requests: u32) -> Admission {
        self.store.hit(identity, max_requests, RATE_LIMIT_INTERVAL)
    }

    /// Derives the client identity from request headers: the first
    /// `X-Forwarded-For` entry, else `X-Real-IP`, else a shared fallback.
    pub fn client_identity(headers: &HeaderMap) -> String {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
        {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }

        if let Some(real_ip) = headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
        {
            let real_ip = real_ip.trim();
            if !real_ip.is_empty() {
                return real_ip.to_string();
            }
        }

        FALLBACK_CLIENT_IDENTITY.to_string()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        RateLimiter::new()
    }
}
