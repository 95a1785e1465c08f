//! ВиК Велико Търново water interruption scraper.
//!
//! The news page renders a list of `.list_item` blocks, each holding a
//! `.date`, a `.text_06` headline wrapping a link, and a `.mb5` summary.
//! A notice is kept when its headline or its summary mentions a watched
//! locality.

use super::{Scraper, child_text, mentions_locality};
use crate::browser::{Session, Waits, wait_until};
use crate::error::{BrowserError, ExtractError};
use crate::models::WaterNotice;
use crate::utils::{resolve_link, truncate_for_log};
use tracing::{debug, error, info, instrument, warn};

const LIST_ITEM: &str = ".list_item";
const DATE: &str = ".date";
const TITLE: &str = ".text_06";
const LINK: &str = "a";
const BODY: &str = ".mb5";

#[derive(Debug, Clone)]
pub struct VikScraper {
    waits: Waits,
}

impl VikScraper {
    pub fn new(waits: Waits) -> Self {
        Self { waits }
    }
}

impl Scraper for VikScraper {
    const NAME: &'static str = "vik";

    type Notice = WaterNotice;

    #[instrument(level = "info", skip_all, fields(url = %session.url()))]
    async fn scrape<S: Session>(&self, session: &S) -> Result<Vec<WaterNotice>, ExtractError> {
        let items = match wait_until(self.waits, "news list items", move || async move {
            let items = session.find_all(LIST_ITEM).await?;
            Ok::<_, BrowserError>((!items.is_empty()).then_some(items))
        })
        .await
        {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "Failed to load news items");
                return Ok(Vec::new());
            }
        };

        info!(count = items.len(), "Found news items");

        let mut notices = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let index = i + 1;
            match read_item(session, item).await {
                Ok(notice) => {
                    info!(index, date = %notice.date, title = %notice.title, "News item");
                    if mentions_locality(&notice.title) || mentions_locality(&notice.text) {
                        info!(index, "Added the interruption to the list");
                        notices.push(notice);
                    } else {
                        debug!(index, text = %truncate_for_log(&notice.text, 120), "No watched locality");
                    }
                }
                Err(e) => warn!(index, error = %e, "Error parsing news item"),
            }
        }

        info!(kept = notices.len(), "Water scrape complete");
        Ok(notices)
    }
}

async fn read_item<S: Session>(session: &S, item: &S::Element) -> Result<WaterNotice, BrowserError> {
    let date = child_text(session, item, DATE).await?;

    let title_element = session.find_in(item, TITLE).await?;
    let title = session.text(&title_element).await?.trim().to_string();

    let anchor = session.find_in(&title_element, LINK).await?;
    let href = session
        .attribute(&anchor, "href")
        .await?
        .ok_or_else(|| BrowserError::NotFound {
            selector: format!("{TITLE} {LINK}[href]"),
        })?;
    let link = resolve_link(session.url(), &href).ok_or_else(|| BrowserError::NotFound {
        selector: format!("{TITLE} {LINK}[href={href:?}]"),
    })?;

    let text = child_text(session, item, BODY).await?;

    Ok(WaterNotice {
        date,
        title,
        text,
        link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeNode, FakeSession};
    use std::time::Duration;

    const PAGE: &str = "https://www.vikvt.com/news";

    fn quick() -> Waits {
        Waits {
            timeout: Duration::from_millis(50),
            poll: Duration::from_millis(5),
        }
    }

    fn item(date: &str, title: &str, href: &str, text: &str) -> FakeNode {
        FakeNode::new(title)
            .child(DATE, FakeNode::new("date").text(date))
            .child(
                TITLE,
                FakeNode::new("title")
                    .text(&format!("  {title}\n"))
                    .child(LINK, FakeNode::new("a").attr("href", href)),
            )
            .child(BODY, FakeNode::new("body").text(text))
    }

    fn page(items: Vec<FakeNode>) -> FakeNode {
        items
            .into_iter()
            .fold(FakeNode::new("root"), |root, i| root.child(LIST_ITEM, i))
    }

    #[tokio::test]
    async fn test_keeps_only_the_item_mentioning_patresh_in_text() {
        let session = FakeSession::new(
            PAGE,
            page(vec![
                item("20.04.2025", "Авария", "/news/1", "гр. Велико Търново, ул. Оборище"),
                item("21.04.2025", "Планов ремонт", "/news/2", "Без вода в с. Патреш от 9 до 16 ч."),
                item("22.04.2025", "Спиране", "/news/3", "гр. Горна Оряховица"),
            ]),
        );

        let notices = VikScraper::new(quick()).scrape(&session).await.unwrap();

        assert_eq!(notices.len(), 1);
        assert_eq!(
            notices[0],
            WaterNotice {
                date: "21.04.2025".to_string(),
                title: "Планов ремонт".to_string(),
                text: "Без вода в с. Патреш от 9 до 16 ч.".to_string(),
                link: url::Url::parse("https://www.vikvt.com/news/2").unwrap(),
            }
        );
    }

    #[tokio::test]
    async fn test_matches_on_title_only() {
        let session = FakeSession::new(
            PAGE,
            page(vec![item("01.05.2025", "Авария в Патреш", "/n/9", "Подробности скоро")]),
        );

        let notices = VikScraper::new(quick()).scrape(&session).await.unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Авария в Патреш");
    }

    #[tokio::test]
    async fn test_pavlikeni_and_ruski_must_share_a_field() {
        let session = FakeSession::new(
            PAGE,
            page(vec![
                item("01.05.2025", "Павликени", "/n/1", "ул. Руски"),
                item("02.05.2025", "Павликени, Руски", "/n/2", "ремонт"),
                item("03.05.2025", "ремонт", "/n/3", "Павликени и Руски"),
            ]),
        );

        let notices = VikScraper::new(quick()).scrape(&session).await.unwrap();
        let dates: Vec<_> = notices.iter().map(|n| n.date.as_str()).collect();
        assert_eq!(dates, vec!["02.05.2025", "03.05.2025"]);
    }

    #[tokio::test]
    async fn test_item_missing_a_field_is_skipped() {
        let broken = FakeNode::new("broken")
            .child(DATE, FakeNode::new("date").text("01.05.2025"))
            .child(BODY, FakeNode::new("body").text("с. Патреш"));
        let session = FakeSession::new(
            PAGE,
            page(vec![broken, item("02.05.2025", "Патреш", "/n/2", "ремонт")]),
        );

        let notices = VikScraper::new(quick()).scrape(&session).await.unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].date, "02.05.2025");
    }

    #[tokio::test]
    async fn test_absolute_links_are_kept() {
        let session = FakeSession::new(
            PAGE,
            page(vec![item("01.05.2025", "Патреш", "https://other.example/x", "")]),
        );

        let notices = VikScraper::new(quick()).scrape(&session).await.unwrap();
        assert_eq!(notices[0].link.as_str(), "https://other.example/x");
    }

    #[tokio::test]
    async fn test_empty_page_yields_no_notices() {
        let session = FakeSession::new(PAGE, FakeNode::new("root"));

        let notices = VikScraper::new(quick()).scrape(&session).await.unwrap();
        assert!(notices.is_empty());
    }
}
