//! Page extractors: strategies for recovering a direct link from a
//! share page.
//!
//! - `StaticExtractor` - single HTTP GET + markup parse, no script
//!   execution; cheap first attempt
//! - `RenderedExtractor` - headless browser with the full heuristic
//!   cascade; slow, robust path
//! - `BrowserSession` - scoped browser acquisition with guaranteed
//!   release

pub mod rendered;
pub mod session;
pub mod static_page;

pub use rendered::{RenderedExtractor, RenderedExtractorConfig};
pub use session::{BrowserSession, SessionAudit};
pub use static_page::{StaticExtractor, StaticExtractorConfig};

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::types::ResolvedLink;

/// A single extraction strategy over a share page.
///
/// Implementations run at most once per resolution attempt and own any
/// sessions they create; nothing outlives the call.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Attempt to resolve the share page into a direct link.
    async fn extract(&self, share_url: &Url) -> Result<ResolvedLink>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
