//! Typed errors for the resolver library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can terminate a resolution attempt.
///
/// Individual strategy misses (a selector not matching, a click
/// throwing) are swallowed inside the extractors; only the outcome of
/// the whole pipeline surfaces as one of these.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Share URL missing or not an absolute HTTP(S) URL
    #[error("invalid share URL: {url}")]
    InvalidUrl { url: String },

    /// Share URL refused by the safety validator
    #[error("blocked URL: {reason}")]
    Blocked { reason: String },

    /// Transport failure or timeout reaching the share page or upstream
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Headless browser could not start
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Every extraction strategy exhausted with no candidate
    #[error("no download link found: {detail}")]
    NotFound { detail: String },

    /// A candidate was found but could not be normalized to an absolute URL
    #[error("could not decode candidate: {value}")]
    Decode { value: String },
}

impl ResolveError {
    /// Wrap a transport-level error.
    pub fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network(Box::new(err))
    }

    /// A `NotFound` with a human-readable detail message.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
