//! In-memory pages for exercising scrapers and the pipeline without Chrome.
//!
//! A [`FakeNode`] tree stands in for the DOM. Children are keyed by the exact
//! selector the scrapers ask for, so fixtures read like the markup they mimic.
//! Clicking an element can swap in a new page, which is how the electricity
//! map's late-loading list is modelled. A page can also change after a number
//! of lookups, for markup that is still being drawn while a scraper polls.

use super::{Launch, Session};
use crate::error::BrowserError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    pub id: String,
    pub text: String,
    pub html: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<(String, FakeNode)>,
}

impl FakeNode {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn child(mut self, selector: &str, node: FakeNode) -> Self {
        self.children.push((selector.to_string(), node));
        self
    }

    fn matching(&self, selector: &str) -> Vec<FakeNode> {
        self.children
            .iter()
            .filter(|(s, _)| s == selector)
            .map(|(_, n)| n.clone())
            .collect()
    }
}

/// Everything a test may want to assert about a session after the fact.
#[derive(Debug, Default)]
pub struct Journal {
    pub queries: Vec<String>,
    pub scrolled: Vec<String>,
    pub clicked: Vec<String>,
    pub closed: Vec<Url>,
}

pub type SharedJournal = Arc<Mutex<Journal>>;

#[derive(Debug)]
pub struct FakeSession {
    url: Url,
    page: Mutex<FakeNode>,
    reveal: Option<(String, FakeNode)>,
    late: Option<(String, usize, FakeNode)>,
    journal: SharedJournal,
}

impl FakeSession {
    pub fn new(url: &str, page: FakeNode) -> Self {
        Self {
            url: Url::parse(url).unwrap(),
            page: Mutex::new(page),
            reveal: None,
            late: None,
            journal: SharedJournal::default(),
        }
    }

    /// Replace the whole page with `page` once the element `id` is clicked.
    pub fn on_click(mut self, id: &str, page: FakeNode) -> Self {
        self.reveal = Some((id.to_string(), page));
        self
    }

    /// Replace the whole page with `page` once `selector` has been looked up
    /// `after` times.
    pub fn after_lookups(mut self, selector: &str, after: usize, page: FakeNode) -> Self {
        self.late = Some((selector.to_string(), after, page));
        self
    }

    pub fn journal(&self) -> SharedJournal {
        Arc::clone(&self.journal)
    }

    fn record(&self, selector: &str) {
        self.journal.lock().unwrap().queries.push(selector.to_string());
    }
}

impl Session for FakeSession {
    type Element = FakeNode;

    fn url(&self) -> &Url {
        &self.url
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeNode>, BrowserError> {
        if let Some((watched, after, page)) = &self.late {
            let lookups = self.journal.lock().unwrap().queries.iter().filter(|q| *q == watched).count();
            if watched == selector && lookups == *after {
                *self.page.lock().unwrap() = page.clone();
            }
        }
        self.record(selector);
        Ok(self.page.lock().unwrap().matching(selector))
    }

    async fn find(&self, selector: &str) -> Result<FakeNode, BrowserError> {
        self.find_all(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn find_in(&self, parent: &FakeNode, selector: &str) -> Result<FakeNode, BrowserError> {
        self.record(selector);
        parent
            .matching(selector)
            .into_iter()
            .next()
            .ok_or_else(|| BrowserError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn find_all_in(&self, parent: &FakeNode, selector: &str) -> Result<Vec<FakeNode>, BrowserError> {
        self.record(selector);
        Ok(parent.matching(selector))
    }

    async fn text(&self, element: &FakeNode) -> Result<String, BrowserError> {
        Ok(element.text.clone())
    }

    async fn inner_html(&self, element: &FakeNode) -> Result<String, BrowserError> {
        Ok(element.html.clone())
    }

    async fn attribute(&self, element: &FakeNode, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(element
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone()))
    }

    async fn scroll_into_view(&self, element: &FakeNode) -> Result<(), BrowserError> {
        self.journal.lock().unwrap().scrolled.push(element.id.clone());
        Ok(())
    }

    async fn click(&self, element: &FakeNode) -> Result<(), BrowserError> {
        self.journal.lock().unwrap().clicked.push(element.id.clone());
        if let Some((id, page)) = &self.reveal {
            if *id == element.id {
                *self.page.lock().unwrap() = page.clone();
            }
        }
        Ok(())
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.journal.lock().unwrap().closed.push(self.url.clone());
        Ok(())
    }
}

/// Hands out pre-built sessions by URL, each at most once.
#[derive(Debug, Default)]
pub struct FakeLauncher {
    sessions: Mutex<HashMap<String, FakeSession>>,
    pub opened: Mutex<Vec<Url>>,
}

impl FakeLauncher {
    pub fn with(self, session: FakeSession) -> Self {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.url.to_string(), session);
        self
    }
}

impl Launch for FakeLauncher {
    type Session = FakeSession;

    async fn open(&self, url: &Url) -> Result<FakeSession, BrowserError> {
        self.opened.lock().unwrap().push(url.clone());
        self.sessions
            .lock()
            .unwrap()
            .remove(url.as_str())
            .ok_or_else(|| BrowserError::Launch(format!("no fake page for {url}")))
    }
}
