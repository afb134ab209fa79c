//! safespace library: URL safety analysis and sandboxed page previews.
//!
//! This library lets a caller submit an arbitrary URL and receive a heuristic
//! safety verdict plus a rewritten, self-contained rendering of the page that
//! is safe to display in an isolated frame. The browser never issues a direct
//! cross-origin request to the untrusted host: all fetching happens
//! server-side, with transport and protocol fallback, and every reference in
//! the returned document is rewritten to be origin-absolute.
//!
//! # Example
//!
//! ```no_run
//! use safespace::{serve, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! serve(&config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod analyzer;
pub mod config;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod normalize;
pub mod rate_limit;
pub mod rewrite;
pub mod server;

// Re-export public API
pub use config::Config;
pub use error_handling::{FetchError, InitializationError};
pub use server::{build_router, serve, AppState};
