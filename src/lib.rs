//! MonAgent: a polite single-site business information extractor
//!
//! This crate fetches one small-business web page under a robots.txt consent
//! policy, parses its loosely structured markup into normalized rows, persists
//! them as CSV and answers keyword questions against the stored data.

pub mod bot;
pub mod config;
pub mod events;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod robots;
pub mod server;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for extraction runs
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL disallowed by robots.txt: {url}")]
    ConsentDenied { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Failed to load page after {attempts} attempts: {source}")]
    FetchExhausted {
        attempts: u32,
        source: Box<ScrapeError>,
    },

    #[error("Unsupported browser: {0}")]
    UnsupportedBrowser(String),

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl ScrapeError {
    /// Returns true if the target was refused by its crawl policy
    pub fn is_consent_denied(&self) -> bool {
        matches!(self, Self::ConsentDenied { .. })
    }

    /// Returns true for transient network or rendering failures
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::HttpStatus { .. }
                | Self::Fetch { .. }
                | Self::Browser(_)
                | Self::FetchExhausted { .. }
                | Self::Reqwest(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration '{0}' does not exist")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
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

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::SiteConfig;
pub use pipeline::{run_with_config, Orchestrator, RunResult};
pub use record::{NormalizedRow, RecordKind, RecordType};
pub use storage::BusinessKnowledge;
pub use url::normalize_url;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_denied_is_not_fetch_failure() {
        let err = ScrapeError::ConsentDenied {
            url: "https://example.com/".to_string(),
        };
        assert!(err.is_consent_denied());
        assert!(!err.is_fetch_failure());
    }

    #[test]
    fn test_exhausted_keeps_last_cause() {
        let err = ScrapeError::FetchExhausted {
            attempts: 2,
            source: Box::new(ScrapeError::Browser("session crashed".to_string())),
        };
        assert!(err.is_fetch_failure());
        assert!(err.to_string().contains("session crashed"));
    }
}
