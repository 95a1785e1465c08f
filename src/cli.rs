//! Command-line interface definitions.
//!
//! Every option has a default, so a scheduled job can run the binary with no
//! arguments from the directory holding `settings.json`.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the interruptions digest.
///
/// # Examples
///
/// ```sh
/// # Scheduled run
/// interruptions_digest
///
/// # Check what would be sent
/// interruptions_digest --settings ./settings.json --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON settings file
    #[arg(short, long, env = "INTERRUPTIONS_SETTINGS", default_value = "settings.json")]
    pub settings: PathBuf,

    /// Log file, appended to on every run
    #[arg(short, long, default_value = "interruption_scraper.log")]
    pub log_file: PathBuf,

    /// Print the digest to stdout instead of emailing it
    #[arg(long)]
    pub dry_run: bool,
}
