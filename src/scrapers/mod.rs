//! Site-specific scrapers for utility interruption notices.
//!
//! Each scraper drives an already-open [`Session`] and returns the notices
//! that mention one of the watched localities. Scrapers never open or close
//! sessions themselves; see [`crate::pipeline`].
//!
//! # Supported Sources
//!
//! | Source | Module | Notice | Notes |
//! |--------|--------|--------|-------|
//! | ВиК Велико Търново | [`vik`] | [`WaterNotice`](crate::models::WaterNotice) | Plain news list |
//! | Енерго Про | [`energo_pro`] | [`PowerNotice`](crate::models::PowerNotice) | List loads after a map marker is clicked |
//!
//! # Degradation
//!
//! - An item that cannot be read is logged and skipped.
//! - A list that never appears yields no notices.
//! - Structural failures (e.g. the electricity map lacks its markers) are
//!   returned as [`ExtractError`] for the caller to act on.

pub mod energo_pro;
pub mod vik;

use crate::browser::Session;
use crate::error::ExtractError;

pub const PATRESH: &str = "Патреш";
pub const PAVLIKENI: &str = "Павликени";
pub const RUSKI: &str = "Руски";

/// Whether `text` refers to one of the watched places.
///
/// Патреш is matched on its own. Руски (Русковци and friends) is too common
/// a prefix, so it only counts next to Павликени.
pub fn mentions_locality(text: &str) -> bool {
    text.contains(PATRESH) || (text.contains(PAVLIKENI) && text.contains(RUSKI))
}

/// A source of notices.
pub trait Scraper {
    /// Short name used in logs and errors.
    const NAME: &'static str;

    type Notice;

    async fn scrape<S: Session>(&self, session: &S) -> Result<Vec<Self::Notice>, ExtractError>;
}

/// Trimmed text of the first `selector` match inside `parent`.
pub(crate) async fn child_text<S: Session>(
    session: &S,
    parent: &S::Element,
    selector: &str,
) -> Result<String, crate::error::BrowserError> {
    let element = session.find_in(parent, selector).await?;
    Ok(session.text(&element).await?.trim().to_string())
}
