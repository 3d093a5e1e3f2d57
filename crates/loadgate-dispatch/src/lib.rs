// crates/loadgate-dispatch/src/lib.rs
// ============================================================================
// Module: Loadgate Dispatch Library
// Description: Alert delivery transports, dispatcher, and audit log.
// Purpose: Route fired alerts to their channels and record the batch.
// Dependencies: lettre, loadgate-rules, reqwest, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Dispatch routes each [`loadgate_rules::AlertRecord`] to the transports
//! registered for its channels. Routing is a registry lookup plus an
//! invocation, never a growing conditional chain. Delivery is one attempt
//! per channel per alert with no retries; channel failures are recorded in
//! the [`DispatchReport`] and never prevent the remaining channels or
//! alerts. After dispatch the whole batch is appended to the alert audit
//! log as a single write, independent of delivery outcomes.
//! Invariants:
//! - Every transport enforces a bounded delivery timeout.
//! - Missing credentials make a channel unavailable, never a hard failure.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod dispatcher;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AlertLog;
pub use audit::AlertLogEntry;
pub use audit::DispatchLogError;
pub use dispatcher::AlertDispatcher;
pub use dispatcher::ChannelOutcome;
pub use dispatcher::DeliveryStatus;
pub use dispatcher::DispatchReport;
pub use transport::CallbackTransport;
pub use transport::ChannelTransport;
pub use transport::DeliveryReceipt;
pub use transport::EmailSettings;
pub use transport::EmailTransport;
pub use transport::Transport;
pub use transport::TransportError;
pub use transport::WebhookSettings;
pub use transport::WebhookTransport;
