//! Browser session lifetime management.
//!
//! Exactly one browser is launched and exactly one is closed per
//! rendered extraction, regardless of outcome. The guard owns the
//! browser and its CDP event task; dropping it without `close` is a
//! leak and is logged.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Counters recording session opens and closes.
///
/// Shared between an extractor and its sessions so tests can verify
/// the close-exactly-once invariant on every exit path.
#[derive(Debug, Clone, Default)]
pub struct SessionAudit {
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl SessionAudit {
    /// Sessions opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Sessions closed so far.
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn record_open(&self) {
        self.opened.fetch_add(1, Ordering::SeqCst);
    }

    fn record_close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Owns a launched browser and guarantees teardown on every exit path.
pub struct BrowserSession {
    browser: Option<Browser>,
    handler_task: Option<JoinHandle<()>>,
    audit: SessionAudit,
    closed: bool,
}

impl BrowserSession {
    /// Take ownership of a launched browser and its event-drain task.
    pub fn new(browser: Browser, handler_task: JoinHandle<()>, audit: SessionAudit) -> Self {
        audit.record_open();
        Self {
            browser: Some(browser),
            handler_task: Some(handler_task),
            audit,
            closed: false,
        }
    }

    /// The live browser handle. Valid until `close`.
    pub fn browser(&self) -> &Browser {
        self.browser
            .as_ref()
            .expect("browser session used after close")
    }

    /// Close the browser and stop the event task.
    ///
    /// Errors during close are logged, not propagated: by this point
    /// the extraction outcome is already decided.
    pub async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!(error = %e, "browser close failed");
            }
            if let Err(e) = browser.wait().await {
                debug!(error = %e, "browser did not exit cleanly");
            }
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
        self.closed = true;
        self.audit.record_close();
    }

    /// Test constructor: a session with no live browser behind it.
    #[cfg(test)]
    fn detached(audit: SessionAudit) -> Self {
        audit.record_open();
        Self {
            browser: None,
            handler_task: None,
            audit,
            closed: false,
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("browser session dropped without close; leaking browser process");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_close_is_recorded_exactly_once() {
        let audit = SessionAudit::default();
        let session = BrowserSession::detached(audit.clone());

        assert_eq!(audit.opened(), 1);
        assert_eq!(audit.closed(), 0);

        session.close().await;

        assert_eq!(audit.opened(), 1);
        assert_eq!(audit.closed(), 1);
    }

    #[tokio::test]
    async fn test_drop_without_close_is_a_leak() {
        let audit = SessionAudit::default();
        {
            let _session = BrowserSession::detached(audit.clone());
        }

        // the leak is logged, not silently counted as a close
        assert_eq!(audit.opened(), 1);
        assert_eq!(audit.closed(), 0);
    }

    #[tokio::test]
    async fn test_sequential_sessions_balance() {
        let audit = SessionAudit::default();

        for _ in 0..3 {
            let session = BrowserSession::detached(audit.clone());
            session.close().await;
        }

        assert_eq!(audit.opened(), 3);
        assert_eq!(audit.closed(), 3);
    }
}
