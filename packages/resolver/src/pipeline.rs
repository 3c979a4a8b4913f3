//! Resolution orchestration.
//!
//! Decides which extractors run and in what order. Each strategy runs
//! at most once per call; there are no retries.

use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::error::{ResolveError, Result};
use crate::extract::PageExtractor;
use crate::security::UrlValidator;
use crate::types::ResolvedLink;

/// Which extraction paths a deployment runs.
///
/// The two observed deployments disagree on whether the cheap static
/// path is worth attempting before the browser path; this is an
/// explicit policy rather than a hard-coded choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Try the static extractor first; fall back to the rendered
    /// extractor on any failure.
    #[default]
    StaticFirst,

    /// Skip the static path; always pay for the browser. For sites
    /// whose share pages are entirely JavaScript-gated.
    RenderedOnly,
}

impl FromStr for ResolutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "static-first" => Ok(Self::StaticFirst),
            "rendered-only" => Ok(Self::RenderedOnly),
            other => Err(format!(
                "unknown resolution policy '{}' (expected 'static-first' or 'rendered-only')",
                other
            )),
        }
    }
}

/// Resolves share URLs through the configured extractor chain.
pub struct Resolver {
    static_extractor: Arc<dyn PageExtractor>,
    rendered_extractor: Arc<dyn PageExtractor>,
    validator: UrlValidator,
    policy: ResolutionPolicy,
}

impl Resolver {
    /// Create a resolver over the two extraction paths with the
    /// default policy.
    pub fn new(
        static_extractor: Arc<dyn PageExtractor>,
        rendered_extractor: Arc<dyn PageExtractor>,
    ) -> Self {
        Self {
            static_extractor,
            rendered_extractor,
            validator: UrlValidator::new(),
            policy: ResolutionPolicy::default(),
        }
    }

    /// Set the orchestration policy.
    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set a custom URL safety validator.
    pub fn with_validator(mut self, validator: UrlValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Resolve a share URL into a direct link, or a typed failure.
    pub async fn resolve(&self, share_url: &str) -> Result<ResolvedLink> {
        let url = parse_share_url(share_url)?;
        self.validator.validate(&url)?;

        match self.policy {
            ResolutionPolicy::StaticFirst => {
                match self.static_extractor.extract(&url).await {
                    Ok(link) => {
                        info!(url = %url, link = %link, "resolved via static path");
                        Ok(link)
                    }
                    Err(e) => {
                        debug!(url = %url, error = %e, "static path failed; falling back to rendered");
                        self.rendered_extractor.extract(&url).await
                    }
                }
            }
            ResolutionPolicy::RenderedOnly => self.rendered_extractor.extract(&url).await,
        }
    }
}

fn parse_share_url(share_url: &str) -> Result<Url> {
    Url::parse(share_url)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .ok_or_else(|| ResolveError::InvalidUrl {
            url: share_url.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractor;

    const SHARE_URL: &str = "https://files.example.com/view/abc";
    const DIRECT: &str = "https://download.example.com/file.zip";

    #[tokio::test]
    async fn test_static_success_short_circuits_rendered() {
        let static_extractor = Arc::new(MockExtractor::succeeding("static", DIRECT));
        let rendered = Arc::new(MockExtractor::succeeding("rendered", DIRECT));
        let resolver = Resolver::new(static_extractor.clone(), rendered.clone());

        let link = resolver.resolve(SHARE_URL).await.unwrap();
        assert_eq!(link.as_str(), DIRECT);
        assert_eq!(static_extractor.calls(), 1);
        assert_eq!(rendered.calls(), 0);
    }

    #[tokio::test]
    async fn test_static_failure_falls_back_to_rendered() {
        let static_extractor = Arc::new(MockExtractor::not_found("static"));
        let rendered = Arc::new(MockExtractor::succeeding("rendered", DIRECT));
        let resolver = Resolver::new(static_extractor.clone(), rendered.clone());

        let link = resolver.resolve(SHARE_URL).await.unwrap();
        assert_eq!(link.as_str(), DIRECT);
        assert_eq!(static_extractor.calls(), 1);
        assert_eq!(rendered.calls(), 1);
    }

    #[tokio::test]
    async fn test_rendered_failure_is_returned_verbatim() {
        let static_extractor = Arc::new(MockExtractor::not_found("static"));
        let rendered = Arc::new(MockExtractor::not_found("rendered"));
        let resolver = Resolver::new(static_extractor, rendered);

        let err = resolver.resolve(SHARE_URL).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rendered_only_policy_skips_static() {
        let static_extractor = Arc::new(MockExtractor::succeeding("static", DIRECT));
        let rendered = Arc::new(MockExtractor::succeeding("rendered", DIRECT));
        let resolver = Resolver::new(static_extractor.clone(), rendered.clone())
            .with_policy(ResolutionPolicy::RenderedOnly);

        resolver.resolve(SHARE_URL).await.unwrap();
        assert_eq!(static_extractor.calls(), 0);
        assert_eq!(rendered.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_url_fails_without_extraction() {
        let static_extractor = Arc::new(MockExtractor::succeeding("static", DIRECT));
        let rendered = Arc::new(MockExtractor::succeeding("rendered", DIRECT));
        let resolver = Resolver::new(static_extractor.clone(), rendered.clone());

        let err = resolver.resolve("not a url").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidUrl { .. }));

        let err = resolver.resolve("ftp://example.com/f").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidUrl { .. }));

        assert_eq!(static_extractor.calls(), 0);
        assert_eq!(rendered.calls(), 0);
    }

    #[tokio::test]
    async fn test_blocked_url_fails_without_extraction() {
        let static_extractor = Arc::new(MockExtractor::succeeding("static", DIRECT));
        let rendered = Arc::new(MockExtractor::succeeding("rendered", DIRECT));
        let resolver = Resolver::new(static_extractor.clone(), rendered.clone());

        let err = resolver.resolve("http://169.254.169.254/").await.unwrap_err();
        assert!(matches!(err, ResolveError::Blocked { .. }));
        assert_eq!(static_extractor.calls(), 0);
        assert_eq!(rendered.calls(), 0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "static-first".parse::<ResolutionPolicy>().unwrap(),
            ResolutionPolicy::StaticFirst
        );
        assert_eq!(
            "rendered-only".parse::<ResolutionPolicy>().unwrap(),
            ResolutionPolicy::RenderedOnly
        );
        assert!("both".parse::<ResolutionPolicy>().is_err());
    }
}
