//! Core data types for share-link resolution.

use std::fmt;

use serde::Serialize;
use url::Url;

/// A value extracted from the share page during one resolution attempt.
///
/// Candidates are ephemeral: they exist only while the cascade runs,
/// and may be an absolute URL, a relative target, or an encoded token.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The raw attribute/text value as found on the page
    pub value: String,

    /// The strategy that produced this candidate
    pub source: CandidateSource,
}

impl Candidate {
    /// Create a candidate tagged with its producing strategy.
    pub fn new(value: impl Into<String>, source: CandidateSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }
}

/// Which strategy produced a candidate. Used in logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// A named entry from the selector cascade
    Selector(&'static str),

    /// Anchor scan for a "file detail page" path
    AnchorPathScan,

    /// Anchor scan for a known binary-file extension
    AnchorExtensionScan,

    /// Regex scan over the raw response body
    BodyScan,

    /// The page navigated somewhere after a simulated click
    PostClickNavigation,

    /// Anchor scan over the post-click DOM
    PostClickAnchorScan,

    /// Target of a meta-refresh redirect instruction
    MetaRefresh,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(name) => write!(f, "selector:{}", name),
            Self::AnchorPathScan => write!(f, "anchor-path-scan"),
            Self::AnchorExtensionScan => write!(f, "anchor-extension-scan"),
            Self::BodyScan => write!(f, "body-scan"),
            Self::PostClickNavigation => write!(f, "post-click-navigation"),
            Self::PostClickAnchorScan => write!(f, "post-click-anchor-scan"),
            Self::MetaRefresh => write!(f, "meta-refresh"),
        }
    }
}

/// An absolute HTTP(S) URL confirmed (or assumed) to point at the
/// file's bytes. Immutable once produced.
///
/// The original string is kept verbatim rather than re-serialized from
/// a parsed form, so a candidate that is already a direct link passes
/// through the decoder unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedLink(String);

impl ResolvedLink {
    /// Validate a value as an absolute HTTP(S) URL.
    pub fn parse(value: &str) -> Option<Self> {
        let parsed = Url::parse(value).ok()?;
        matches!(parsed.scheme(), "http" | "https").then(|| Self(value.to_string()))
    }

    /// The resolved URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the link, yielding the URL string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResolvedLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_link_accepts_http_and_https() {
        assert!(ResolvedLink::parse("https://download.example.com/file.zip").is_some());
        assert!(ResolvedLink::parse("http://example.com/a").is_some());
    }

    #[test]
    fn test_resolved_link_rejects_other_schemes() {
        assert!(ResolvedLink::parse("ftp://example.com/file.zip").is_none());
        assert!(ResolvedLink::parse("file:///etc/passwd").is_none());
        assert!(ResolvedLink::parse("not a url").is_none());
    }

    #[test]
    fn test_resolved_link_keeps_original_string() {
        let link = ResolvedLink::parse("https://download.example.com/file.zip").unwrap();
        assert_eq!(link.as_str(), "https://download.example.com/file.zip");
    }

    #[test]
    fn test_candidate_source_display() {
        assert_eq!(
            CandidateSource::Selector("download-button-id").to_string(),
            "selector:download-button-id"
        );
        assert_eq!(CandidateSource::MetaRefresh.to_string(), "meta-refresh");
    }
}
