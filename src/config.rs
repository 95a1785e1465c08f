//! Run settings, read once from a JSON file at startup.
//!
//! ```json
//! {
//!   "vik_vt_url": "https://www.vikvt.com/bg/news",
//!   "energo_pro_url": "https://www.energo-pro.bg/bg/planirani-prekysvanija",
//!   "email_token": "xkeysib-…",
//!   "email_sender": "alerts@example.com",
//!   "email_recipients": ["someone@example.com"]
//! }
//! ```
//!
//! Optional keys: `email_sender_name`, `wait_timeout_secs`, `settle_millis`,
//! `chrome_executable`.

use crate::api::Sender;
use crate::browser::Waits;
use crate::error::ConfigError;
use itertools::Itertools;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

fn default_sender_name() -> String {
    "Interruptions Alerts".to_string()
}

fn default_wait_timeout_secs() -> u64 {
    20
}

fn default_settle_millis() -> u64 {
    2000
}

#[derive(Clone, Deserialize)]
pub struct Settings {
    /// ВиК news page.
    pub vik_vt_url: Url,
    /// Енерго Про outage map.
    pub energo_pro_url: Url,
    /// Brevo API key.
    pub email_token: String,
    pub email_sender: String,
    #[serde(default = "default_sender_name")]
    pub email_sender_name: String,
    pub email_recipients: Vec<String>,
    /// How long to wait for page content before giving up.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    /// Pause after clicking the electricity map marker.
    #[serde(default = "default_settle_millis")]
    pub settle_millis: u64,
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("vik_vt_url", &self.vik_vt_url.as_str())
            .field("energo_pro_url", &self.energo_pro_url.as_str())
            .field("email_token", &"<redacted>")
            .field("email_sender", &self.email_sender)
            .field("email_sender_name", &self.email_sender_name)
            .field("email_recipients", &self.email_recipients)
            .field("wait_timeout_secs", &self.wait_timeout_secs)
            .field("settle_millis", &self.settle_millis)
            .field("chrome_executable", &self.chrome_executable)
            .finish()
    }
}

impl Settings {
    /// Read, parse and validate the settings file at `path`.
    ///
    /// # Errors
    ///
    /// Any unreadable file, malformed JSON, missing key, blank API key,
    /// blank sender or empty recipient list.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(recipients = settings.email_recipients.len(), "Loaded settings");
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        settings.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        if self.email_token.trim().is_empty() {
            return Err(ConfigError::Invalid("email_token is empty".to_string()));
        }
        if self.email_sender.trim().is_empty() {
            return Err(ConfigError::Invalid("email_sender is empty".to_string()));
        }
        self.email_recipients = self
            .email_recipients
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .unique()
            .map(str::to_string)
            .collect();
        if self.email_recipients.is_empty() {
            return Err(ConfigError::Invalid("email_recipients is empty".to_string()));
        }
        Ok(self)
    }

    pub fn waits(&self) -> Waits {
        Waits::new(Duration::from_secs(self.wait_timeout_secs))
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }

    pub fn sender(&self) -> Sender {
        Sender {
            name: self.email_sender_name.clone(),
            email: self.email_sender.trim().to_string(),
        }
    }
}
