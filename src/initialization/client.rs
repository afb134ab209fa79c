//! HTTP client initialization.
//!
//! One shared `reqwest::Client` serves every outbound fetch: direct attempts,
//! relayed attempts, and per-stylesheet fetches during a rewrite.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::FETCH_TIMEOUT;

/// Initializes the shared HTTP client.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from configuration
/// - The per-attempt fetch timeout, covering connect through body completion
/// - Redirect following enabled (reqwest default, up to 10 hops)
/// - Rustls TLS backend
///
/// # Arguments
///
/// * `user_agent` - User-Agent string sent with every request
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(user_agent: &str) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(FETCH_TIMEOUT)
        .user_agent(user_agent)
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_succeeds() {
        let client = init_client("test-agent/1.0");
        assert!(client.is_ok());
    }
}
