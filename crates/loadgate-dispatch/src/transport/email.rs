// crates/loadgate-dispatch/src/transport/email.rs
// ============================================================================
// Module: Email Transport
// Description: SMTP delivery of alerts via STARTTLS.
// Purpose: Send one plain-text message per recipient for each alert.
// Dependencies: lettre, loadgate-rules
// ============================================================================

//! ## Overview
//! The email transport sends one plain-text message per configured recipient
//! for each alert. The sending account comes from settings or the
//! `EMAIL_USER` environment variable; the password comes only from
//! `EMAIL_PASSWORD` and its absence makes the channel unavailable rather
//! than a delivery failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::time::Duration;

use lettre::Message;
use lettre::SmtpTransport;
use lettre::Transport as SmtpSend;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use loadgate_rules::AlertRecord;

use crate::transport::DeliveryReceipt;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable supplying the sending account when configuration
/// does not.
pub const EMAIL_USER_ENV: &str = "EMAIL_USER";

/// Environment variable supplying the SMTP password.
pub const EMAIL_PASSWORD_ENV: &str = "EMAIL_PASSWORD";

/// Default SMTP submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default SMTP timeout in milliseconds.
pub const DEFAULT_SMTP_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Email transport settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSettings {
    /// SMTP relay host.
    pub smtp_server: String,
    /// SMTP submission port; `None` uses the default.
    pub port: Option<u16>,
    /// Sending account; `None` falls back to [`EMAIL_USER_ENV`].
    pub account: Option<String>,
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Delivery timeout in milliseconds; `None` uses the default.
    pub timeout_ms: Option<u64>,
}

// ============================================================================
// SECTION: Email Transport
// ============================================================================

/// SMTP alert transport.
///
/// # Invariants
/// - One message per recipient per alert; a failure on any recipient fails
///   the whole delivery for that alert.
/// - Credentials are read from the environment at construction time only.
pub struct EmailTransport {
    /// Sending account address.
    account: String,
    /// Recipient addresses.
    recipients: Vec<String>,
    /// Configured SMTP relay.
    mailer: SmtpTransport,
}

impl EmailTransport {
    /// Creates the transport, resolving credentials from settings and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unavailable`] when the account, password,
    /// relay host, or recipient list is missing, or when the relay cannot be
    /// configured.
    pub fn from_settings(settings: &EmailSettings) -> Result<Self, TransportError> {
        if settings.smtp_server.trim().is_empty() {
            return Err(TransportError::Unavailable("no smtp server configured".to_string()));
        }
        if settings.recipients.is_empty() {
            return Err(TransportError::Unavailable("no email recipients configured".to_string()));
        }
        let account = settings
            .account
            .clone()
            .or_else(|| env::var(EMAIL_USER_ENV).ok())
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                TransportError::Unavailable(format!("no email account ({EMAIL_USER_ENV} unset)"))
            })?;
        let password = env::var(EMAIL_PASSWORD_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                TransportError::Unavailable(format!("no email password ({EMAIL_PASSWORD_ENV} unset)"))
            })?;
        let timeout = Duration::from_millis(settings.timeout_ms.unwrap_or(DEFAULT_SMTP_TIMEOUT_MS));
        let mailer = SmtpTransport::starttls_relay(&settings.smtp_server)
            .map_err(|err| TransportError::Unavailable(err.to_string()))?
            .port(settings.port.unwrap_or(DEFAULT_SMTP_PORT))
            .credentials(Credentials::new(account.clone(), password))
            .timeout(Some(timeout))
            .build();
        Ok(Self {
            account,
            recipients: settings.recipients.clone(),
            mailer,
        })
    }

    /// Renders the plain-text body for one alert.
    #[must_use]
    pub fn body(alert: &AlertRecord) -> String {
        format!(
            "Alert: {name}\nSeverity: {severity}\nTime: {timestamp}\n\n{message}\n\n\
             P95 latency: {p95:.2}ms\nError rate: {errors:.2}%\nThroughput: {tps:.2} rps\n\
             BDD success: {bdd:.2}%\n",
            name = alert.name,
            severity = alert.severity.label(),
            timestamp = alert.timestamp,
            message = alert.message,
            p95 = alert.metrics.response_time_p95,
            errors = alert.metrics.error_rate,
            tps = alert.metrics.throughput,
            bdd = alert.metrics.bdd_success_rate,
        )
    }
}

impl Transport for EmailTransport {
    fn deliver(&self, alert: &AlertRecord) -> Result<DeliveryReceipt, TransportError> {
        let from: Mailbox = self
            .account
            .parse()
            .map_err(|_| TransportError::Unavailable("invalid sending account".to_string()))?;
        let subject = format!("[{}] {}", alert.severity.label(), alert.name);
        let body = Self::body(alert);
        for recipient in &self.recipients {
            let to: Mailbox = recipient
                .parse()
                .map_err(|_| TransportError::DeliveryFailed("invalid recipient address".to_string()))?;
            let message = Message::builder()
                .from(from.clone())
                .to(to)
                .subject(subject.clone())
                .body(body.clone())
                .map_err(|err| TransportError::DeliveryFailed(err.to_string()))?;
            self.mailer
                .send(&message)
                .map_err(|err| TransportError::DeliveryFailed(err.to_string()))?;
        }
        Ok(DeliveryReceipt {
            transport: "email".to_string(),
            endpoint: format!("{} recipient(s)", self.recipients.len()),
        })
    }
}
