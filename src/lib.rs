//! linkwalk: a broken-link checker
//!
//! This crate fetches a page (and optionally its whole site, breadth-first up to a
//! depth bound), extracts hyperlinks and verifies that each of them resolves. Requests
//! can be routed through an ordered list of access routes, links are checked in small
//! concurrent windows, and the whole operation can be cancelled at any point.

pub mod api;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for linkwalk operations
#[derive(Debug, Error)]
pub enum LinkwalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    /// The shared cancellation token fired. Never reported as a broken link.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("All {attempts} access routes failed: {last_error}")]
    RoutesExhausted { attempts: usize, last_error: String },

    #[error("Page {url} returned HTTP {status}")]
    PageStatus { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Remote checker returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response from remote checker: {0}")]
    Protocol(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LinkwalkError {
    /// Returns true if this error represents cooperative cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid access route: {0}")]
    InvalidRoute(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for linkwalk operations
pub type Result<T> = std::result::Result<T, LinkwalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{check_links, CrawlEvent, CrawlOptions, CrawlReport, Crawler};
pub use state::LinkCheckResult;
pub use tokio_util::sync::CancellationToken;
