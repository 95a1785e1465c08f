//! One complete run: scrape both providers, then mail the digest if there is
//! anything to report.
//!
//! Sessions are opened one at a time and each is closed before the next one
//! is opened, whatever the scraper returned.

use crate::api::Mailer;
use crate::browser::{Launch, Session};
use crate::config::Settings;
use crate::error::RunError;
use crate::models::{PowerNotice, WaterNotice};
use crate::outputs::html::build_digest;
use crate::scrapers::Scraper;
use crate::scrapers::energo_pro::EnergoProScraper;
use crate::scrapers::vik::VikScraper;
use tracing::{error, info, instrument, warn};
use url::Url;

/// How a run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Neither source had a matching notice; nothing was sent.
    Skipped,
    /// A digest with this many notices per source was delivered.
    Sent { water: usize, power: usize },
}

/// Scrape both providers and deliver the digest.
///
/// # Errors
///
/// Browser launch failures, a missing electricity map marker, and delivery
/// failures. Scrapes that merely find nothing are not errors.
#[instrument(level = "info", skip_all)]
pub async fn run<L, M>(launcher: &L, mailer: &M, settings: &Settings) -> Result<Outcome, RunError>
where
    L: Launch,
    M: Mailer,
{
    let water = scrape(launcher, &settings.vik_vt_url, &VikScraper::new(settings.waits())).await?;
    let power = scrape(
        launcher,
        &settings.energo_pro_url,
        &EnergoProScraper::new(settings.waits(), settings.settle()),
    )
    .await?;

    info!(?water, "Water interruptions");
    info!(?power, "Electricity interruptions");

    deliver(mailer, &settings.email_recipients, &water, &power).await
}

/// Mail the digest for `water` and `power`, unless both are empty.
pub async fn deliver<M: Mailer>(
    mailer: &M,
    recipients: &[String],
    water: &[WaterNotice],
    power: &[PowerNotice],
) -> Result<Outcome, RunError> {
    if water.is_empty() && power.is_empty() {
        info!("No interruptions found. Skipping email.");
        return Ok(Outcome::Skipped);
    }

    let html = build_digest(water, power);
    mailer.send(recipients, &html).await?;
    Ok(Outcome::Sent {
        water: water.len(),
        power: power.len(),
    })
}

/// Open a session on `url`, run `scraper` on it and close it again.
#[instrument(level = "info", skip_all, fields(source = S::NAME, %url))]
async fn scrape<L, S>(launcher: &L, url: &Url, scraper: &S) -> Result<Vec<S::Notice>, RunError>
where
    L: Launch,
    S: Scraper,
{
    let session = launcher.open(url).await.map_err(|source| {
        error!(error = %source, "Browser setup failed");
        RunError::Launch {
            url: url.to_string(),
            source,
        }
    })?;

    let result = scraper.scrape(&session).await;

    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close browser");
    }
    info!("Scraping complete. Browser closed.");

    result.map_err(|source| {
        error!(error = %source, "Scrape aborted");
        RunError::Extract {
            source_name: S::NAME,
            source,
        }
    })
}
