//! Headless Chrome sessions over the DevTools protocol.
//!
//! Each [`ChromeSession`] owns its own browser process and the task that
//! drives the protocol connection. Dropping a session without calling
//! [`Session::close`] still kills the process, but a clean close waits for it
//! to exit.

use super::{Launch, Session};
use crate::error::BrowserError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Starts a fresh headless Chrome for every session.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    /// Explicit Chrome binary; auto-detected when `None`.
    pub executable: Option<PathBuf>,
    /// Upper bound for a single protocol request.
    pub request_timeout: Duration,
}

impl ChromeLauncher {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self {
            executable,
            request_timeout: Duration::from_secs(30),
        }
    }

    fn config(&self) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .window_size(1920, 1080)
            .request_timeout(self.request_timeout);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(BrowserError::Launch)
    }
}

impl Launch for ChromeLauncher {
    type Session = ChromeSession;

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn open(&self, url: &Url) -> Result<ChromeSession, BrowserError> {
        info!("Setting up headless Chrome browser");
        let (mut browser, mut handler) = Browser::launch(self.config()?).await?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "DevTools handler error");
                }
            }
        });

        let page = match open_page(&browser, url).await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!(error = %close_err, "Failed to close browser after navigation error");
                }
                events.abort();
                return Err(e);
            }
        };

        info!("Page loaded");
        Ok(ChromeSession {
            browser,
            page,
            events,
            url: url.clone(),
        })
    }
}

async fn open_page(browser: &Browser, url: &Url) -> Result<Page, BrowserError> {
    let page = browser.new_page(url.as_str()).await?;
    page.wait_for_navigation().await?;
    Ok(page)
}

/// One browser process with one page open.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    events: JoinHandle<()>,
    url: Url,
}

impl std::fmt::Debug for ChromeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeSession").field("url", &self.url.as_str()).finish()
    }
}

impl Session for ChromeSession {
    type Element = Element;

    fn url(&self) -> &Url {
        &self.url
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<Element>, BrowserError> {
        Ok(self.page.find_elements(selector).await?)
    }

    async fn find(&self, selector: &str) -> Result<Element, BrowserError> {
        self.page.find_element(selector).await.map_err(|e| {
            debug!(selector, error = %e, "find_element failed");
            BrowserError::NotFound {
                selector: selector.to_string(),
            }
        })
    }

    async fn find_in(&self, parent: &Element, selector: &str) -> Result<Element, BrowserError> {
        parent.find_element(selector).await.map_err(|e| {
            debug!(selector, error = %e, "find_element failed");
            BrowserError::NotFound {
                selector: selector.to_string(),
            }
        })
    }

    async fn find_all_in(&self, parent: &Element, selector: &str) -> Result<Vec<Element>, BrowserError> {
        Ok(parent.find_elements(selector).await?)
    }

    async fn text(&self, element: &Element) -> Result<String, BrowserError> {
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    async fn inner_html(&self, element: &Element) -> Result<String, BrowserError> {
        Ok(element.inner_html().await?.unwrap_or_default())
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(element.attribute(name).await?)
    }

    async fn scroll_into_view(&self, element: &Element) -> Result<(), BrowserError> {
        element.scroll_into_view().await?;
        Ok(())
    }

    async fn click(&self, element: &Element) -> Result<(), BrowserError> {
        // Map markers sit under overlay panes, so a synthetic mouse click can land elsewhere.
        element
            .call_js_fn("function() { this.click(); }", false)
            .await?;
        Ok(())
    }

    async fn close(mut self) -> Result<(), BrowserError> {
        let closed = self.browser.close().await;
        if closed.is_ok() {
            if let Err(e) = self.browser.wait().await {
                warn!(error = %e, "Browser process did not exit cleanly");
            }
        }
        self.events.abort();
        closed?;
        info!(url = %self.url, "Browser closed");
        Ok(())
    }
}
