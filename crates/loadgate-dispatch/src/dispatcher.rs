// crates/loadgate-dispatch/src/dispatcher.rs
// ============================================================================
// Module: Alert Dispatcher
// Description: Fan-out of alerts to the registered channel transports.
// Purpose: Deliver each alert to each of its channels, isolating failures.
// Dependencies: loadgate-rules
// ============================================================================

//! ## Overview
//! The dispatcher owns a registry of channel transports and fans each alert
//! out to every channel the alert names. Delivery is best-effort per channel:
//! one channel failing, or not being registered at all, never stops delivery
//! to the remaining channels or alerts. The caller gets a full report of
//! every attempted delivery.
//!
//! Invariants:
//! - Every (alert, channel) pair produces exactly one outcome in the report.
//! - Transport errors are captured in outcomes, never propagated.
//! - Alerts are dispatched in input order; channels in declaration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use loadgate_rules::AlertRecord;
use loadgate_rules::ChannelId;

use crate::transport::Transport;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The transport accepted the alert.
    Delivered,
    /// The transport attempted delivery and failed.
    Failed(String),
    /// No transport is registered for the channel.
    Unavailable,
}

impl DeliveryStatus {
    /// Returns `true` for a successful delivery.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// One attempted delivery of one alert to one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOutcome {
    /// Name of the alert that was dispatched.
    pub alert: String,
    /// Channel the delivery was addressed to.
    pub channel: ChannelId,
    /// What happened.
    pub status: DeliveryStatus,
}

/// Full record of one dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Every attempted delivery, in dispatch order.
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    /// Number of successful deliveries.
    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.is_delivered())
            .count()
    }

    /// Number of deliveries that were attempted and failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, DeliveryStatus::Failed(_)))
            .count()
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Registry of channel transports with best-effort fan-out.
#[derive(Default)]
pub struct AlertDispatcher {
    /// Registered transports keyed by channel.
    transports: BTreeMap<ChannelId, Arc<dyn Transport>>,
}

impl AlertDispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transport for a channel, replacing any previous one.
    pub fn register(&mut self, channel: ChannelId, transport: Arc<dyn Transport>) {
        self.transports.insert(channel, transport);
    }

    /// Returns `true` when a transport is registered for the channel.
    #[must_use]
    pub fn has_channel(&self, channel: ChannelId) -> bool {
        self.transports.contains_key(&channel)
    }

    /// Dispatches every alert to every channel it names.
    #[must_use]
    pub fn dispatch(&self, alerts: &[AlertRecord]) -> DispatchReport {
        let mut report = DispatchReport::default();
        for alert in alerts {
            for channel in &alert.channels {
                let status = match self.transports.get(channel) {
                    Some(transport) => match transport.deliver(alert) {
                        Ok(_) => DeliveryStatus::Delivered,
                        Err(err) => DeliveryStatus::Failed(err.to_string()),
                    },
                    None => DeliveryStatus::Unavailable,
                };
                report.outcomes.push(ChannelOutcome {
                    alert: alert.name.clone(),
                    channel: *channel,
                    status,
                });
            }
        }
        report
    }
}
