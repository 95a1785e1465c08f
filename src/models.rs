//! Notice records produced by the scrapers.
//!
//! - [`WaterNotice`]: an announcement from the ВиК (water) news list
//! - [`PowerNotice`]: an entry from the Енерго Про (electricity) outage map
//!
//! Every field is mandatory. A scraper that cannot fill all of them skips the
//! item instead of producing a partial record.

use url::Url;

/// A water supply interruption announced by ВиК Велико Търново.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterNotice {
    /// Publication date as shown on the page.
    pub date: String,
    /// Headline of the announcement.
    pub title: String,
    /// Short body text under the headline.
    pub text: String,
    /// Absolute link to the full announcement.
    pub link: Url,
}

/// A planned electricity interruption listed by Енерго Про.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerNotice {
    /// Time window of the interruption, e.g. `"22.04.2025 09:00 - 16:00"`.
    pub period: String,
    /// Affected streets and settlements.
    pub text: String,
}
