//! Static extraction: one HTTP GET and a markup parse.
//!
//! Exists purely as a low-cost first attempt. Never opens a browser,
//! never executes page scripts; pages that build their download button
//! client-side fall through to the rendered extractor.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::decode::decode;
use crate::error::{ResolveError, Result};
use crate::extract::PageExtractor;
use crate::strategies::{
    has_binary_extension, is_detail_path, scan_download_host, SelectorStrategy, BUTTON_SELECTORS,
    DEAD_HREF, URL_ATTRIBUTES, USER_AGENT,
};
use crate::types::{Candidate, CandidateSource, ResolvedLink};

/// Configuration for the static extractor.
#[derive(Debug, Clone)]
pub struct StaticExtractorConfig {
    /// User agent sent with the page fetch
    pub user_agent: String,

    /// Overall fetch timeout
    pub timeout: Duration,
}

impl Default for StaticExtractorConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

/// Fetches the share page over plain HTTP and applies the selector
/// cascade to the parsed markup.
pub struct StaticExtractor {
    client: reqwest::Client,
    config: StaticExtractorConfig,
}

impl Default for StaticExtractor {
    fn default() -> Self {
        Self::new(StaticExtractorConfig::default())
    }
}

impl StaticExtractor {
    /// Create a static extractor with the given configuration.
    pub fn new(config: StaticExtractorConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// Set a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(url = %url, "static fetch starting");
        let response = self
            .client
            .get(url.as_str())
            .header("User-Agent", &self.config.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "static fetch failed");
                ResolveError::network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::network(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP {}", status),
            )));
        }

        response.text().await.map_err(ResolveError::network)
    }
}

#[async_trait]
impl PageExtractor for StaticExtractor {
    async fn extract(&self, share_url: &Url) -> Result<ResolvedLink> {
        let body = self.fetch(share_url).await?;

        match extract_from_html(&body) {
            Some((candidate, link)) => {
                debug!(
                    source = %candidate.source,
                    link = %link,
                    "static extraction succeeded"
                );
                Ok(link)
            }
            None => Err(ResolveError::not_found("no static strategy matched")),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Apply the candidate cascade to a fetched page body.
///
/// Pure: candidates are gathered in priority order and the first one
/// that decodes to an absolute URL wins. A candidate that fails to
/// decode is a failed candidate, not a fatal error.
fn extract_from_html(body: &str) -> Option<(Candidate, ResolvedLink)> {
    candidates(body)
        .into_iter()
        .find_map(|candidate| decode(&candidate.value).map(|link| (candidate, link)))
}

/// Gather candidates from all strategies, in fixed priority order.
fn candidates(body: &str) -> Vec<Candidate> {
    let document = Html::parse_document(body);
    let mut found = Vec::new();

    // 1. Download-button selector cascade
    for strategy in BUTTON_SELECTORS {
        if let Some(candidate) = element_candidate(&document, strategy) {
            found.push(candidate);
        }
    }

    // 2. Anchors pointing at a file detail page
    let hrefs = anchor_hrefs(&document);
    if let Some(href) = hrefs.iter().find(|h| is_detail_path(h)) {
        found.push(Candidate::new(*href, CandidateSource::AnchorPathScan));
    }

    // 3. Anchors ending in a known binary extension
    if let Some(href) = hrefs.iter().find(|h| has_binary_extension(h)) {
        found.push(Candidate::new(*href, CandidateSource::AnchorExtensionScan));
    }

    // 4. Raw-body scan for a download-subdomain URL
    if let Some(embedded) = scan_download_host(body) {
        found.push(Candidate::new(embedded, CandidateSource::BodyScan));
    }

    found
}

/// The first usable URL attribute of the first element matching a
/// selector strategy.
fn element_candidate(document: &Html, strategy: &SelectorStrategy) -> Option<Candidate> {
    let selector = Selector::parse(strategy.css).unwrap();
    let element = document.select(&selector).next()?;

    for attr in URL_ATTRIBUTES {
        match element.value().attr(attr) {
            Some(value) if !value.is_empty() && value != DEAD_HREF => {
                return Some(Candidate::new(
                    value,
                    CandidateSource::Selector(strategy.name),
                ));
            }
            _ => {}
        }
    }
    None
}

fn anchor_hrefs(document: &Html) -> Vec<&str> {
    let selector = Selector::parse("a[href]").unwrap();
    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .collect()
}
