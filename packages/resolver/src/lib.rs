//! Share-page link resolution library.
//!
//! Resolves a public file-sharing "share page" URL into a direct,
//! byte-servable download URL. The share page may scramble its href
//! attributes, render its download button client-side, or redirect via
//! meta-refresh; resolution is a cascade of extraction strategies that
//! degrade from a cheap HTTP fetch to a full headless-browser session.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use resolver::{RenderedExtractor, Resolver, StaticExtractor};
//!
//! let resolver = Resolver::new(
//!     Arc::new(StaticExtractor::default()),
//!     Arc::new(RenderedExtractor::default()),
//! );
//!
//! match resolver.resolve("https://files.example.com/view/abc").await {
//!     Ok(link) => println!("{}", link),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```
//!
//! # Modules
//!
//! - [`extract`] - the two page extractors and the browser session guard
//! - [`pipeline`] - orchestration policy over the extractors
//! - [`decode`] - candidate link normalization (scrambled URLs,
//!   relative redirect targets)
//! - [`strategies`] - the selector cascade as data
//! - [`security`] - safety validation of caller-supplied URLs
//! - [`probe`] - browser runtime discovery, run once at process start
//! - [`testing`] - mock extractors for tests

pub mod decode;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod probe;
pub mod security;
pub mod strategies;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use decode::{decode, decode_relative};
pub use error::{ResolveError, Result};
pub use extract::{
    BrowserSession, PageExtractor, RenderedExtractor, RenderedExtractorConfig, SessionAudit,
    StaticExtractor, StaticExtractorConfig,
};
pub use pipeline::{ResolutionPolicy, Resolver};
pub use probe::{probe, BrowserRuntime};
pub use security::UrlValidator;
pub use types::{Candidate, CandidateSource, ResolvedLink};
