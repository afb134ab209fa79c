//! HTTP server: router construction and serving.
//!
//! Endpoints:
//! - `POST /api/analyze` - heuristic safety verdict for a URL
//! - `POST /api/preview` - fetched, rewritten page for sandboxed rendering
//! - `GET /api/proxy` - same-origin relay fetch with CORS headers
//! - `POST /api/screenshot` - permanently stubbed capture capability

pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use log::info;

use crate::config::Config;
use crate::fetch::Resolver;
use crate::initialization::init_client;
use crate::rate_limit::RateLimiter;

/// Shared state handed to every request handler.
///
/// Handlers are stateless apart from this: the rate limiter is the only
/// cross-request mutable state in the process.
#[derive(Clone)]
pub struct AppState {
    /// Shared outbound HTTP client.
    pub client: Arc<reqwest::Client>,
    /// Page fetcher with transport and protocol fallback.
    pub resolver: Arc<Resolver>,
    /// Admission gate shared by all endpoints.
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Builds the application state around a shared HTTP client.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        AppState {
            resolver: Arc::new(Resolver::new(Arc::clone(&client))),
            limiter: Arc::new(RateLimiter::new()),
            client,
        }
    }
}

/// Builds the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/analyze",
            post(handlers::analyze::handle).get(handlers::method_not_allowed),
        )
        .route(
            "/api/preview",
            post(handlers::preview::handle).get(handlers::method_not_allowed),
        )
        .route(
            "/api/proxy",
            get(handlers::proxy::handle).options(handlers::proxy::preflight),
        )
        .route(
            "/api/screenshot",
            post(handlers::screenshot::handle).get(handlers::method_not_allowed),
        )
        .with_state(state)
}

/// Initializes the HTTP client, binds the listener, and serves until the
/// process is stopped.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let client = init_client(&config.user_agent)?;
    let state = AppState::new(client);
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("Listening on http://{addr}/");
    info!("  - Analyze:    POST http://{addr}/api/analyze");
    info!("  - Preview:    POST http://{addr}/api/preview");
    info!("  - Proxy:      GET  http://{addr}/api/proxy?url=...");
    info!("  - Screenshot: POST http://{addr}/api/screenshot");

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
