//! Error types for every stage of a run.
//!
//! Each stage has its own error so callers can tell a degraded scrape from a
//! fatal one. Only [`RunError`] reaches `main`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures talking to the headless browser.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The browser process could not be configured or started.
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// A DevTools protocol call failed.
    #[error("browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// No element matched the selector.
    #[error("no element matches `{selector}`")]
    NotFound { selector: String },

    /// A bounded wait expired before its condition held.
    #[error("timed out after {after:?} waiting for {what}")]
    Timeout { what: String, after: Duration },
}

/// Failures that end a single source's extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The electricity map did not expose the marker that reveals the notices.
    #[error("expected at least 2 map markers, found {found}")]
    MissingMarkers { found: usize },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// Problems with the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Failures delivering the digest.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email API rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("cannot write preview: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that aborts a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot open {url}: {source}")]
    Launch {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("{source_name} scrape failed: {source}")]
    Extract {
        source_name: &'static str,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Send(#[from] SendError),
}
