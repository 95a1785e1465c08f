//! # Interruptions Digest
//!
//! Watches the planned-outage pages of the Veliko Tarnovo water (ВиК) and
//! electricity (Енерго Про) providers and emails subscribers a digest of the
//! notices that concern Патреш or the Руски streets of Павликени.
//!
//! ## Usage
//!
//! ```sh
//! interruptions_digest --settings ./settings.json
//! ```
//!
//! ## Architecture
//!
//! Each run is a straight pipeline:
//! 1. **Scraping**: open headless Chrome on each provider page in turn and
//!    collect the matching notices
//! 2. **Rendering**: build one HTML digest from both result sets
//! 3. **Delivery**: send it through Brevo, or skip when there is nothing new

use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt, prelude::*};

mod api;
mod browser;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use api::{BrevoMailer, PreviewMailer};
use browser::chrome::ChromeLauncher;
use cli::Cli;
use config::Settings;
use pipeline::Outcome;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    // --- Tracing init: console plus append-only log file ---
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tfmt::layer()
                .with_target(true)
                .with_timer(tfmt::time::UtcTime::rfc_3339()),
        )
        .with(
            tfmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_timer(tfmt::time::UtcTime::rfc_3339())
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    let start_time = std::time::Instant::now();
    info!("interruptions_digest starting up");
    debug!(?args, "Parsed CLI arguments");

    let settings = match Settings::load(&args.settings) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Failed to load settings");
            return Err(e.into());
        }
    };
    debug!(?settings, "Settings");

    let launcher = ChromeLauncher::new(settings.chrome_executable.clone());
    let outcome = if args.dry_run {
        pipeline::run(&launcher, &PreviewMailer, &settings).await
    } else {
        let mailer = BrevoMailer::new(settings.email_token.clone(), settings.sender());
        pipeline::run(&launcher, &mailer, &settings).await
    };

    let elapsed = start_time.elapsed();
    match outcome {
        Ok(Outcome::Skipped) => info!(?elapsed, "Run complete; nothing to send"),
        Ok(Outcome::Sent { water, power }) => info!(?elapsed, water, power, "Run complete; digest sent"),
        Err(e) => {
            error!(?elapsed, error = %e, "Run aborted");
            return Err(e.into());
        }
    }

    Ok(())
}
