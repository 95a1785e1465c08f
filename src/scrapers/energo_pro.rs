//! Енерго Про planned interruption scraper.
//!
//! The outage page is a Leaflet map. Its `#interruption_areas` list stays
//! empty until a region marker is activated, so scraping runs in two phases:
//!
//! 1. **Markers**: wait for at least two marker icons, activate the second one (the
//!    Велико Търново region) and let the list settle.
//! 2. **List**: wait for the list to fill, then read each `li`'s period and
//!    text.
//!
//! Missing markers abort the scrape with [`ExtractError::MissingMarkers`];
//! an empty list only means there is nothing to report.

use super::{Scraper, child_text, mentions_locality};
use crate::browser::{Session, Waits, wait_until};
use crate::error::{BrowserError, ExtractError};
use crate::models::PowerNotice;
use crate::utils::truncate_for_log;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

const MARKER: &str = "img.leaflet-marker-icon";
const AREAS: &str = "#interruption_areas";
const ITEM: &str = "li";
const PERIOD: &str = ".period";
const TEXT: &str = ".text";

/// Markup of at most this many characters is the list's empty shell.
const MIN_AREAS_HTML: usize = 10;

/// Zero-based index of the marker whose list we want.
const REGION_MARKER: usize = 1;

#[derive(Debug, Clone)]
pub struct EnergoProScraper {
    waits: Waits,
    settle: Duration,
}

impl EnergoProScraper {
    /// `settle` is the pause after activating the marker.
    pub fn new(waits: Waits, settle: Duration) -> Self {
        Self { waits, settle }
    }

    #[instrument(level = "info", skip_all)]
    async fn activate_region<S: Session>(&self, session: &S) -> Result<(), ExtractError> {
        let markers = match wait_until(self.waits, "map markers", move || async move {
            let markers = session.find_all(MARKER).await?;
            Ok::<_, BrowserError>((markers.len() > REGION_MARKER).then_some(markers))
        })
        .await
        {
            Ok(markers) => markers,
            Err(e) => {
                let found = session.find_all(MARKER).await.map_or(0, |markers| markers.len());
                error!(found, error = %e, "Less than 2 markers found");
                return Err(ExtractError::MissingMarkers { found });
            }
        };

        let marker = &markers[REGION_MARKER];
        info!("Clicking the second map marker");
        session.scroll_into_view(marker).await?;
        session.click(marker).await?;
        sleep(self.settle).await;
        Ok(())
    }

    #[instrument(level = "info", skip_all)]
    async fn read_areas<S: Session>(&self, session: &S) -> Vec<PowerNotice> {
        let areas = match wait_until(self.waits, "interruption areas", move || async move {
            let areas = session.find(AREAS).await?;
            let html = session.inner_html(&areas).await?;
            Ok::<_, BrowserError>((html.trim().chars().count() > MIN_AREAS_HTML).then_some(areas))
        })
        .await
        {
            Ok(areas) => areas,
            Err(e) => {
                error!(error = %e, "No interruptions loaded or timeout");
                return Vec::new();
            }
        };

        let items = match session.find_all_in(&areas, ITEM).await {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "Cannot list interruptions");
                return Vec::new();
            }
        };
        info!(count = items.len(), "Found interruptions");

        let mut notices = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let index = i + 1;
            match read_item(session, item).await {
                Ok(notice) => {
                    info!(index, period = %notice.period, text = %truncate_for_log(&notice.text, 200), "Interruption");
                    if mentions_locality(&notice.text) {
                        info!(index, "Added the interruption to the list");
                        notices.push(notice);
                    } else {
                        debug!(index, "No watched locality");
                    }
                }
                Err(e) => warn!(index, error = %e, "Error parsing interruption"),
            }
        }
        notices
    }
}

impl Scraper for EnergoProScraper {
    const NAME: &'static str = "energo_pro";

    type Notice = PowerNotice;

    #[instrument(level = "info", skip_all, fields(url = %session.url()))]
    async fn scrape<S: Session>(&self, session: &S) -> Result<Vec<PowerNotice>, ExtractError> {
        self.activate_region(session).await?;
        let notices = self.read_areas(session).await;
        info!(kept = notices.len(), "Electricity scrape complete");
        Ok(notices)
    }
}

async fn read_item<S: Session>(session: &S, item: &S::Element) -> Result<PowerNotice, BrowserError> {
    Ok(PowerNotice {
        period: child_text(session, item, PERIOD).await?,
        text: child_text(session, item, TEXT).await?,
    })
}
