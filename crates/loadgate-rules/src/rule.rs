// crates/loadgate-rules/src/rule.rs
// ============================================================================
// Module: Alert Rules and Records
// Description: Declarative rule definitions and fired alert records.
// Purpose: Model the configured rules and their instantiations.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`AlertRule`] is loaded once from configuration and read-only during
//! evaluation. An [`AlertRecord`] is the instantiation of a rule that
//! matched: severity and channels are copied verbatim from the definition,
//! the message template is rendered against the triggering metrics, and the
//! metrics scope is embedded for audit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::engine::MetricsScope;

// ============================================================================
// SECTION: Severity and Channels
// ============================================================================

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocking problem, page-worthy.
    Critical,
    /// Degradation worth attention.
    Warning,
    /// Informational notice.
    Info,
}

impl Severity {
    /// Returns the uppercase label used in rendered notifications.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

/// Delivery channel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelId {
    /// Chat-webhook delivery.
    Slack,
    /// SMTP delivery.
    Email,
}

impl ChannelId {
    /// Returns the channel name used in configuration and reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Slack => "slack",
            Self::Email => "email",
        }
    }
}

// ============================================================================
// SECTION: Rule Definition
// ============================================================================

/// Declarative alert rule.
///
/// # Invariants
/// - Read-only during evaluation; loaded once from configuration.
/// - `condition` must parse under the restricted grammar; configuration
///   loading validates this up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRule {
    /// Unique rule name.
    pub name: String,
    /// Severity attached to fired alerts.
    pub severity: Severity,
    /// Boolean condition text over the four metric variables.
    pub condition: String,
    /// Message template; `{variable}` placeholders are substituted at fire
    /// time.
    pub message: String,
    /// Channels alerts from this rule are delivered to.
    pub channels: Vec<ChannelId>,
}

// ============================================================================
// SECTION: Alert Record
// ============================================================================

/// Instantiation of a rule that matched one metrics snapshot.
///
/// # Invariants
/// - `severity` and `channels` are copied verbatim from the rule.
/// - `metrics` is the exact scope the condition was evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Name of the originating rule.
    pub name: String,
    /// Severity copied from the rule.
    pub severity: Severity,
    /// Rendered message.
    pub message: String,
    /// Fire time, RFC 3339, supplied by the caller.
    pub timestamp: String,
    /// Channels copied from the rule.
    pub channels: Vec<ChannelId>,
    /// Metrics scope that triggered the rule.
    pub metrics: MetricsScope,
}
