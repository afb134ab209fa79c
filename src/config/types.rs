//! CLI option types and parsing.

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use super::constants::DEFAULT_USER_AGENT;

/// Service configuration, parsed from the command line and environment.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "safespace",
    about = "URL safety analysis and sandboxed preview service"
)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1", env = "SAFESPACE_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080, env = "SAFESPACE_PORT")]
    pub port: u16,

    /// Minimum log level to display
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// User-Agent header for outbound fetches
    #[arg(long, default_value = DEFAULT_USER_AGENT, env = "SAFESPACE_USER_AGENT")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["safespace"])
    }
}

/// Log verbosity levels accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Normal operational output
    Info,
    /// Verbose debugging output
    Debug,
    /// Extremely verbose tracing output
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Log output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output with colors
    Plain,
    /// Machine-readable JSON lines
    Json,
}
