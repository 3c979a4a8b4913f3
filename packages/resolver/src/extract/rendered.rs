//! Rendered extraction: drive a headless browser through the full
//! heuristic cascade.
//!
//! Slow, robust path for pages that only build their download control
//! client-side. Every call launches its own isolated browser session
//! and tears it down before returning, whatever the outcome.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::decode::decode_relative;
use crate::error::{ResolveError, Result};
use crate::extract::session::{BrowserSession, SessionAudit};
use crate::extract::PageExtractor;
use crate::probe::BrowserRuntime;
use crate::strategies::{
    has_binary_extension, parse_meta_refresh, BUTTON_SELECTORS, DEAD_HREF, FOLDER_PATH_MARKER,
    RENDERED_EXTRA_SELECTORS, URL_ATTRIBUTES, USER_AGENT,
};
use crate::types::{Candidate, CandidateSource, ResolvedLink};

const LAUNCH_ARGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--no-zygote",
];

/// Configuration for the rendered extractor.
#[derive(Debug, Clone)]
pub struct RenderedExtractorConfig {
    /// User agent presented by the browser
    pub user_agent: String,

    /// Viewport size
    pub viewport: (u32, u32),

    /// Bound on navigation and per-operation CDP calls
    pub navigation_timeout: Duration,

    /// Delay after navigation for client-side rendering to settle
    pub settle_delay: Duration,

    /// Delay after a simulated click before checking for navigation
    pub click_settle_delay: Duration,

    /// Where the diagnostic screenshot lands when nothing matches
    pub screenshot_path: PathBuf,

    /// Browser executable/profile discovery from the environment probe
    pub runtime: BrowserRuntime,
}

impl Default for RenderedExtractorConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            viewport: (1366, 768),
            navigation_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_secs(8),
            click_settle_delay: Duration::from_secs(2),
            screenshot_path: PathBuf::from("debug.png"),
            runtime: BrowserRuntime::default(),
        }
    }
}

/// Drives headless Chromium through the selector cascade.
pub struct RenderedExtractor {
    config: RenderedExtractorConfig,
    audit: SessionAudit,
    session_seq: AtomicU64,
}

impl Default for RenderedExtractor {
    fn default() -> Self {
        Self::new(RenderedExtractorConfig::default())
    }
}

impl RenderedExtractor {
    /// Create a rendered extractor with the given configuration.
    pub fn new(config: RenderedExtractorConfig) -> Self {
        Self {
            config,
            audit: SessionAudit::default(),
            session_seq: AtomicU64::new(0),
        }
    }

    /// Session open/close counters, for leak verification.
    pub fn audit(&self) -> SessionAudit {
        self.audit.clone()
    }

    async fn launch(&self) -> Result<BrowserSession> {
        let (width, height) = self.config.viewport;
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .incognito()
            .viewport(Viewport {
                width,
                height,
                ..Default::default()
            })
            .request_timeout(self.config.navigation_timeout)
            .args(LAUNCH_ARGS.iter().copied());

        if let Some(executable) = &self.config.runtime.executable {
            builder = builder.chrome_executable(executable);
        }
        if let Some(dir) = self.session_data_dir() {
            builder = builder.user_data_dir(dir);
        }

        let browser_config = builder.build().map_err(ResolveError::BrowserLaunch)?;
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ResolveError::BrowserLaunch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(BrowserSession::new(browser, handler_task, self.audit.clone()))
    }

    /// Per-session profile dir under the configured cache root.
    ///
    /// Sessions must not share a profile (Chromium takes a singleton
    /// lock per user-data-dir, and concurrent requests each get their
    /// own browser), so the root is subdivided by process and sequence
    /// number. With no cache root configured the browser library picks
    /// its own temp dir.
    fn session_data_dir(&self) -> Option<PathBuf> {
        let root = self.config.runtime.user_data_dir.as_ref()?;
        let seq = self.session_seq.fetch_add(1, Ordering::SeqCst);
        Some(root.join(format!("session-{}-{}", std::process::id(), seq)))
    }

    async fn run_cascade(&self, session: &BrowserSession, share_url: &Url) -> Result<ResolvedLink> {
        let page = session
            .browser()
            .new_page("about:blank")
            .await
            .map_err(ResolveError::network)?;

        if let Err(e) = page.set_user_agent(&self.config.user_agent).await {
            debug!(error = %e, "could not set user agent");
        }

        // Navigation failures do not abort the attempt; the cascade
        // still reads whatever DOM state exists.
        match tokio::time::timeout(
            self.config.navigation_timeout,
            page.goto(share_url.as_str()),
        )
        .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(url = %share_url, error = %e, "navigation failed; reading current DOM"),
            Err(_) => warn!(url = %share_url, "navigation timed out; reading current DOM"),
        }

        tokio::time::sleep(self.config.settle_delay).await;

        let candidate = match self.selector_cascade(&page, share_url).await {
            Some(candidate) => candidate,
            None => match self.meta_refresh_candidate(&page).await {
                Some(candidate) => candidate,
                None => {
                    let detail = self.capture_screenshot(&page).await;
                    return Err(ResolveError::not_found(detail));
                }
            },
        };

        debug!(source = %candidate.source, value = %candidate.value, "candidate selected");

        decode_relative(&candidate.value, share_url).ok_or(ResolveError::Decode {
            value: candidate.value,
        })
    }

    /// Walk the rendered selector cascade; the first strategy to yield
    /// a candidate wins.
    async fn selector_cascade(&self, page: &Page, share_url: &Url) -> Option<Candidate> {
        for strategy in BUTTON_SELECTORS.iter().chain(RENDERED_EXTRA_SELECTORS) {
            let element = match page.find_element(strategy.css).await {
                Ok(element) => element,
                Err(_) => continue,
            };

            debug!(strategy = strategy.name, "selector matched");

            // a. href already usable
            if let Ok(Some(href)) = element.attribute("href").await {
                if href.starts_with("http") && href != DEAD_HREF {
                    return Some(Candidate::new(href, CandidateSource::Selector(strategy.name)));
                }
            }

            // b. obfuscated/alternate URL attributes
            for attr in &URL_ATTRIBUTES[1..] {
                if let Ok(Some(value)) = element.attribute(attr).await {
                    if !value.is_empty() {
                        return Some(Candidate::new(
                            value,
                            CandidateSource::Selector(strategy.name),
                        ));
                    }
                }
            }

            // c. click and watch for navigation; click failures are
            // swallowed, the page may navigate anyway
            if let Err(e) = element.click().await {
                debug!(strategy = strategy.name, error = %e, "click failed");
            }
            tokio::time::sleep(self.config.click_settle_delay).await;

            if let Ok(Some(current)) = page.url().await {
                if current.starts_with("http")
                    && current != share_url.as_str()
                    && !current.contains(FOLDER_PATH_MARKER)
                {
                    return Some(Candidate::new(current, CandidateSource::PostClickNavigation));
                }
            }

            // d. post-click DOM may have revealed a direct anchor
            if let Some(href) = self.scan_anchors(page).await {
                return Some(Candidate::new(href, CandidateSource::PostClickAnchorScan));
            }
        }

        None
    }

    /// All anchor targets on the current DOM, filtered to known
    /// binary-file extensions.
    async fn scan_anchors(&self, page: &Page) -> Option<String> {
        let hrefs: Vec<String> = page
            .evaluate("Array.from(document.querySelectorAll('a[href]')).map(a => a.href)")
            .await
            .ok()?
            .into_value()
            .ok()?;

        hrefs.into_iter().find(|href| has_binary_extension(href))
    }

    /// Meta-refresh redirect target, if the page declares one.
    async fn meta_refresh_candidate(&self, page: &Page) -> Option<Candidate> {
        let content: Option<String> = page
            .evaluate(
                r#"(() => {
                    const el = document.querySelector('meta[http-equiv="refresh" i]');
                    return el ? el.getAttribute('content') : null;
                })()"#,
            )
            .await
            .ok()?
            .into_value()
            .ok()?;

        let target = parse_meta_refresh(&content?)?.to_string();
        Some(Candidate::new(target, CandidateSource::MetaRefresh))
    }

    /// Capture the page state for operator debugging before giving up.
    /// Returns the not-found detail message.
    async fn capture_screenshot(&self, page: &Page) -> String {
        let params = ScreenshotParams::builder().full_page(true).build();
        match page.screenshot(params).await {
            Ok(bytes) => {
                let path = &self.config.screenshot_path;
                match tokio::fs::write(path, bytes).await {
                    Ok(()) => format!("screenshot saved to {}", path.display()),
                    Err(e) => {
                        warn!(error = %e, "could not write diagnostic screenshot");
                        "no strategy matched".to_string()
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "could not capture diagnostic screenshot");
                "no strategy matched".to_string()
            }
        }
    }
}

#[async_trait]
impl PageExtractor for RenderedExtractor {
    async fn extract(&self, share_url: &Url) -> Result<ResolvedLink> {
        let session = self.launch().await?;

        // The session closes on every path out of the cascade; only a
        // panic can leak it, and then the guard's drop logs the leak.
        let outcome = self.run_cascade(&session, share_url).await;
        session.close().await;

        match outcome {
            Ok(link) => {
                info!(url = %share_url, link = %link, "rendered extraction succeeded");
                Ok(link)
            }
            Err(e) => {
                warn!(url = %share_url, error = %e, "rendered extraction failed");
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        "rendered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_data_dirs_are_unique_per_session() {
        let config = RenderedExtractorConfig {
            runtime: BrowserRuntime {
                executable: None,
                user_data_dir: Some(PathBuf::from("/tmp/browser-cache")),
            },
            ..Default::default()
        };
        let extractor = RenderedExtractor::new(config);

        let first = extractor.session_data_dir().unwrap();
        let second = extractor.session_data_dir().unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("/tmp/browser-cache"));
    }

    #[test]
    fn test_no_cache_root_means_no_profile_dir() {
        let extractor = RenderedExtractor::default();
        assert!(extractor.session_data_dir().is_none());
    }
}
