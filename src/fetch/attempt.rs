//! Fetch attempt records.

use std::fmt;

/// Transport used for one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Outbound request issued directly by this process.
    Direct,
    /// Request routed through the same-origin relay fetch path.
    Relay,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Direct => write!(f, "direct"),
            Transport::Relay => write!(f, "relay"),
        }
    }
}

/// One failed try against one URL variant via one transport.
///
/// Successful attempts short-circuit the resolver and are never recorded;
/// the attempt list exists purely for diagnostics on exhaustion.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    /// The URL variant that was tried.
    pub url: String,
    /// The transport used.
    pub transport: Transport,
    /// Why the attempt failed.
    pub reason: String,
}

impl FetchAttempt {
    /// Records a failed attempt.
    pub fn failure(url: &str, transport: Transport, reason: impl Into<String>) -> Self {
        FetchAttempt {
            url: url.to_string(),
            transport,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FetchAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): {}", self.transport, self.url, self.reason)
    }
}
