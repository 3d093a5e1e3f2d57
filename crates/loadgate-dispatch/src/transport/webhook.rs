// crates/loadgate-dispatch/src/transport/webhook.rs
// ============================================================================
// Module: Webhook Transport
// Description: Chat-webhook delivery via bounded HTTP POST.
// Purpose: Post one attachment payload per alert to the configured webhook.
// Dependencies: loadgate-rules, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The webhook transport posts a chat-attachment payload (severity color,
//! title, message, and metric fields) to a single URL. The URL comes from
//! configuration or, failing that, the `SLACK_WEBHOOK_URL` environment
//! variable; absence of both makes the channel unavailable. Requests carry
//! an explicit timeout and redirects are not followed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::time::Duration;

use loadgate_rules::AlertRecord;
use loadgate_rules::Severity;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde_json::Value;
use serde_json::json;

use crate::transport::DeliveryReceipt;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable supplying the webhook URL when configuration does
/// not.
pub const WEBHOOK_URL_ENV: &str = "SLACK_WEBHOOK_URL";

/// Default delivery timeout in milliseconds.
pub const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Webhook transport settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookSettings {
    /// Webhook URL; `None` falls back to [`WEBHOOK_URL_ENV`].
    pub url: Option<String>,
    /// Delivery timeout in milliseconds; `None` uses the default.
    pub timeout_ms: Option<u64>,
}

// ============================================================================
// SECTION: Webhook Transport
// ============================================================================

/// Chat-webhook alert transport.
///
/// # Invariants
/// - One POST per delivered alert; redirects are never followed.
/// - Non-2xx responses are delivery failures.
pub struct WebhookTransport {
    /// Resolved webhook URL.
    url: String,
    /// HTTP client with the bounded timeout applied.
    client: Client,
}

impl WebhookTransport {
    /// Creates the transport, resolving the URL from settings or the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unavailable`] when no URL is configured or
    /// the HTTP client cannot be built.
    pub fn from_settings(settings: &WebhookSettings) -> Result<Self, TransportError> {
        let url = settings
            .url
            .clone()
            .or_else(|| env::var(WEBHOOK_URL_ENV).ok())
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                TransportError::Unavailable(format!("no webhook url ({WEBHOOK_URL_ENV} unset)"))
            })?;
        let timeout = Duration::from_millis(settings.timeout_ms.unwrap_or(DEFAULT_WEBHOOK_TIMEOUT_MS));
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| TransportError::Unavailable(err.to_string()))?;
        Ok(Self {
            url,
            client,
        })
    }

    /// Builds the attachment payload for one alert.
    #[must_use]
    pub fn payload(alert: &AlertRecord) -> Value {
        json!({
            "attachments": [{
                "color": severity_color(alert.severity),
                "title": format!("Alert {}: {}", alert.severity.label(), alert.name),
                "text": alert.message,
                "fields": [
                    { "title": "Timestamp", "value": alert.timestamp, "short": true },
                    { "title": "TPS", "value": format!("{:.2}", alert.metrics.throughput), "short": true },
                    { "title": "Error Rate", "value": format!("{:.2}%", alert.metrics.error_rate), "short": true },
                    { "title": "P95 Latency", "value": format!("{:.2}ms", alert.metrics.response_time_p95), "short": true },
                ],
            }]
        })
    }
}

/// Returns the attachment color for a severity.
const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "#e74c3c",
        Severity::Warning => "#f39c12",
        Severity::Info => "#3498db",
    }
}

impl Transport for WebhookTransport {
    fn deliver(&self, alert: &AlertRecord) -> Result<DeliveryReceipt, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(alert))
            .send()
            .map_err(|err| TransportError::DeliveryFailed(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }
        Ok(DeliveryReceipt {
            transport: "webhook".to_string(),
            endpoint: "webhook url (redacted)".to_string(),
        })
    }
}
