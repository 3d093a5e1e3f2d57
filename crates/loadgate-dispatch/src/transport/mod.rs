// crates/loadgate-dispatch/src/transport/mod.rs
// ============================================================================
// Module: Delivery Transports
// Description: Transport trait and shared delivery types.
// Purpose: Deliver one alert payload to one concrete channel endpoint.
// Dependencies: loadgate-rules, thiserror
// ============================================================================

//! ## Overview
//! A [`Transport`] delivers a fully-formed alert to one channel endpoint and
//! reports success or failure. Transports make exactly one attempt and must
//! bound their delivery time; unbounded network waits would stall the whole
//! dispatch batch. Construction resolves endpoint settings and secrets;
//! a transport that cannot be constructed leaves its channel unregistered
//! ("channel unavailable"), which the dispatcher records and skips.

// ============================================================================
// SECTION: Imports
// ============================================================================

use loadgate_rules::AlertRecord;
use thiserror::Error;

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Errors emitted by delivery transports.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Transport could not be constructed (bad endpoint, missing secret).
    #[error("channel unavailable: {0}")]
    Unavailable(String),
    /// Delivery attempt failed before a response was received.
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
    /// Endpoint answered with a non-success status.
    #[error("endpoint rejected delivery: status {status}")]
    Status {
        /// HTTP status code returned by the endpoint.
        status: u16,
    },
}

// ============================================================================
// SECTION: Delivery Receipt
// ============================================================================

/// Record of one successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Transport name that performed the delivery.
    pub transport: String,
    /// Endpoint description (redacted where secret-bearing).
    pub endpoint: String,
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Delivers one alert to one channel endpoint.
pub trait Transport: Send + Sync {
    /// Delivers the alert; exactly one attempt.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when delivery fails; the dispatcher logs
    /// the failure and continues.
    fn deliver(&self, alert: &AlertRecord) -> Result<DeliveryReceipt, TransportError>;
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

pub mod callback;
pub mod channel;
pub mod email;
pub mod webhook;

pub use callback::CallbackTransport;
pub use channel::ChannelTransport;
pub use email::EmailSettings;
pub use email::EmailTransport;
pub use webhook::WebhookSettings;
pub use webhook::WebhookTransport;
