//! Headless browser access for the scrapers.
//!
//! The scrapers only see the [`Session`] trait: a live page they can query,
//! read and poke. How a session comes to exist is the job of a [`Launch`]
//! implementation, and closing it is the caller's job, so extraction code
//! never manages browser lifecycles.
//!
//! # Implementations
//!
//! | Type | Module | Notes |
//! |------|--------|-------|
//! | [`chrome::ChromeLauncher`] | [`chrome`] | Headless Chrome over the DevTools protocol |
//! | `fake::FakeLauncher` | `fake` | In-memory pages for tests |

pub mod chrome;
#[cfg(test)]
pub mod fake;

use crate::error::BrowserError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;
use url::Url;

/// A page open in a browser, addressed with CSS selectors.
pub trait Session {
    /// Handle to an element on the page.
    type Element;

    /// The URL the session was opened at.
    fn url(&self) -> &Url;

    /// All elements matching `selector`, possibly none.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>, BrowserError>;

    /// The first element matching `selector`.
    async fn find(&self, selector: &str) -> Result<Self::Element, BrowserError>;

    /// The first descendant of `parent` matching `selector`.
    async fn find_in(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Self::Element, BrowserError>;

    /// All descendants of `parent` matching `selector`.
    async fn find_all_in(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, BrowserError>;

    /// Rendered text of the element.
    async fn text(&self, element: &Self::Element) -> Result<String, BrowserError>;

    /// Markup inside the element.
    async fn inner_html(&self, element: &Self::Element) -> Result<String, BrowserError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    async fn scroll_into_view(&self, element: &Self::Element) -> Result<(), BrowserError>;

    /// Activates the element the way a script `element.click()` would.
    async fn click(&self, element: &Self::Element) -> Result<(), BrowserError>;

    /// Shuts the page and its browser down.
    async fn close(self) -> Result<(), BrowserError>;
}

/// Opens a [`Session`] on a URL.
pub trait Launch {
    type Session: Session;

    async fn open(&self, url: &Url) -> Result<Self::Session, BrowserError>;
}

/// Bounds for [`wait_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waits {
    /// Give up after this long.
    pub timeout: Duration,
    /// Re-check this often.
    pub poll: Duration,
}

impl Waits {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll: Duration::from_millis(500),
        }
    }
}

/// Poll `probe` until it yields a value or `waits.timeout` elapses.
///
/// A probe returning `Ok(None)` means "not yet". Probe errors are treated the
/// same way, since elements that are still rendering routinely fail lookups.
///
/// # Errors
///
/// [`BrowserError::Timeout`] naming `what` when the deadline passes.
pub async fn wait_until<T, F, Fut>(waits: Waits, what: &str, mut probe: F) -> Result<T, BrowserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, BrowserError>>,
{
    // Timeouts too large to represent never expire.
    let deadline = Instant::now().checked_add(waits.timeout);
    loop {
        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => debug!(what, error = %e, "Probe failed; still waiting"),
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(BrowserError::Timeout {
                what: what.to_string(),
                after: waits.timeout,
            });
        }
        sleep(waits.poll).await;
    }
}
