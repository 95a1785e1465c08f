//! Delivery of the digest through the Brevo transactional email API.
//!
//! # Architecture
//!
//! - [`Mailer`]: what the pipeline needs, a way to send one HTML email
//! - [`BrevoMailer`]: sends through `POST /v3/smtp/email`
//! - [`PreviewMailer`]: prints the digest instead, for `--dry-run`
//!
//! Delivery is attempted once. Any failure is logged with the API's reply and
//! handed back to the caller.

use crate::error::SendError;
use crate::utils::truncate_for_log;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, error, info, instrument};

/// Subject line of every digest.
pub const SUBJECT: &str = "Нови Прекъсвания на Услуги";

const BREVO_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

/// Sends a finished digest to a list of recipients.
pub trait Mailer {
    async fn send(&self, to: &[String], html: &str) -> Result<(), SendError>;
}

/// The `From:` of outgoing mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sender {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
struct Recipient<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendSmtpEmail<'a> {
    sender: &'a Sender,
    to: Vec<Recipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

/// Brevo (formerly Sendinblue) transactional email client.
pub struct BrevoMailer {
    client: reqwest::Client,
    api_key: String,
    sender: Sender,
    endpoint: String,
}

impl std::fmt::Debug for BrevoMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrevoMailer")
            .field("sender", &self.sender)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl BrevoMailer {
    pub fn new(api_key: impl Into<String>, sender: Sender) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            sender,
            endpoint: BREVO_ENDPOINT.to_string(),
        }
    }

    fn payload<'a>(&'a self, to: &'a [String], html: &'a str) -> SendSmtpEmail<'a> {
        SendSmtpEmail {
            sender: &self.sender,
            to: to.iter().map(|email| Recipient { email: email.as_str() }).collect(),
            subject: SUBJECT,
            html_content: html,
        }
    }
}

impl Mailer for BrevoMailer {
    #[instrument(level = "info", skip_all, fields(recipients = to.len()))]
    async fn send(&self, to: &[String], html: &str) -> Result<(), SendError> {
        debug!(bytes = html.len(), "Constructing HTML email");
        info!("Sending email");

        let response = match self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.payload(to, html))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Email request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            error!(
                status = status.as_u16(),
                body = %truncate_for_log(&body, 1000),
                "Brevo rejected send_transac_email"
            );
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), body = %truncate_for_log(&body, 200), "Brevo accepted message");
        info!("Email sent");
        Ok(())
    }
}

/// Writes the digest to stdout instead of sending it.
#[derive(Debug, Default)]
pub struct PreviewMailer;

impl Mailer for PreviewMailer {
    async fn send(&self, to: &[String], html: &str) -> Result<(), SendError> {
        info!(recipients = ?to, "Dry run; printing digest instead of sending");
        let mut out = std::io::stdout().lock();
        writeln!(out, "{html}")?;
        Ok(())
    }
}
