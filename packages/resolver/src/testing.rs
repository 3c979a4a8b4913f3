//! Testing utilities including mock extractors.
//!
//! Useful for exercising orchestration and HTTP handlers without
//! network access or a browser.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::{ResolveError, Result};
use crate::extract::PageExtractor;
use crate::types::ResolvedLink;

/// What a [`MockExtractor`] returns on each call.
#[derive(Debug, Clone)]
enum MockOutcome {
    Success(String),
    NotFound,
    Network,
    BrowserLaunch,
}

/// A mock extractor with call tracking for assertions.
pub struct MockExtractor {
    name: &'static str,
    outcome: MockOutcome,
    calls: Arc<AtomicUsize>,
}

impl MockExtractor {
    /// An extractor that always resolves to the given link.
    pub fn succeeding(name: &'static str, link: &str) -> Self {
        Self::with_outcome(name, MockOutcome::Success(link.to_string()))
    }

    /// An extractor whose strategies all come up empty.
    pub fn not_found(name: &'static str) -> Self {
        Self::with_outcome(name, MockOutcome::NotFound)
    }

    /// An extractor that fails at the transport layer.
    pub fn network_error(name: &'static str) -> Self {
        Self::with_outcome(name, MockOutcome::Network)
    }

    /// An extractor whose browser never starts.
    pub fn browser_launch_error(name: &'static str) -> Self {
        Self::with_outcome(name, MockOutcome::BrowserLaunch)
    }

    fn with_outcome(name: &'static str, outcome: MockOutcome) -> Self {
        Self {
            name,
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times `extract` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageExtractor for MockExtractor {
    async fn extract(&self, _share_url: &Url) -> Result<ResolvedLink> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            MockOutcome::Success(link) => {
                ResolvedLink::parse(link).ok_or_else(|| ResolveError::Decode { value: link.clone() })
            }
            MockOutcome::NotFound => Err(ResolveError::not_found("no strategy matched")),
            MockOutcome::Network => Err(ResolveError::network(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "mock transport failure",
            ))),
            MockOutcome::BrowserLaunch => Err(ResolveError::BrowserLaunch(
                "mock browser unavailable".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}
