//! Error type definitions and categorization.

mod types;

pub use types::{FetchError, InitializationError};
