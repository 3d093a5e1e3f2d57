// crates/loadgate-dispatch/tests/dispatcher.rs
// ============================================================================
// Module: Dispatcher Tests
// Description: Fan-out ordering, failure isolation, and registry lookups.
// Purpose: Verify best-effort delivery across channels and alerts.
// Dependencies: loadgate-dispatch, loadgate-rules
// ============================================================================

//! Tests for the alert dispatcher.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::float_cmp,
    reason = "Test-only assertions, exact float expectations are intended."
)]

use std::sync::Arc;
use std::sync::mpsc;

use loadgate_dispatch::AlertDispatcher;
use loadgate_dispatch::CallbackTransport;
use loadgate_dispatch::ChannelTransport;
use loadgate_dispatch::DeliveryReceipt;
use loadgate_dispatch::DeliveryStatus;
use loadgate_dispatch::TransportError;
use loadgate_rules::AlertRecord;
use loadgate_rules::ChannelId;
use loadgate_rules::MetricsScope;
use loadgate_rules::Severity;

/// Builds an alert addressed to the given channels.
fn alert(name: &str, channels: Vec<ChannelId>) -> AlertRecord {
    AlertRecord {
        name: name.to_string(),
        severity: Severity::Critical,
        message: format!("{name} fired"),
        timestamp: "2026-08-26T12:00:00Z".to_string(),
        channels,
        metrics: MetricsScope {
            response_time_p95: 2200.0,
            error_rate: 7.5,
            throughput: 6.0,
            bdd_success_rate: 100.0,
        },
    }
}

/// A transport that always reports success.
fn succeeding() -> CallbackTransport {
    CallbackTransport::new(|_alert| {
        Ok(DeliveryReceipt {
            transport: "test".to_string(),
            endpoint: "test endpoint".to_string(),
        })
    })
}

/// A transport that always fails.
fn failing(reason: &'static str) -> CallbackTransport {
    CallbackTransport::new(move |_alert| Err(TransportError::DeliveryFailed(reason.to_string())))
}

#[test]
fn failed_channel_does_not_block_the_next_one() {
    let mut dispatcher = AlertDispatcher::new();
    dispatcher.register(ChannelId::Slack, Arc::new(failing("webhook down")));
    dispatcher.register(ChannelId::Email, Arc::new(succeeding()));

    let alerts = vec![alert("slow_p95", vec![ChannelId::Slack, ChannelId::Email])];
    let report = dispatcher.dispatch(&alerts);

    assert_eq!(report.outcomes.len(), 2);
    assert!(matches!(report.outcomes[0].status, DeliveryStatus::Failed(_)));
    assert_eq!(report.outcomes[1].status, DeliveryStatus::Delivered);
    assert_eq!(report.delivered_count(), 1);
    assert_eq!(report.failed_count(), 1);
}

#[test]
fn unavailable_channel_is_reported_not_fatal() {
    let dispatcher = AlertDispatcher::new();
    let alerts = vec![alert("high_errors", vec![ChannelId::Email])];

    let report = dispatcher.dispatch(&alerts);

    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].status, DeliveryStatus::Unavailable);
    assert_eq!(report.delivered_count(), 0);
}

#[test]
fn alerts_fan_out_in_input_order() {
    let (sender, receiver) = mpsc::channel();
    let mut dispatcher = AlertDispatcher::new();
    dispatcher.register(ChannelId::Slack, Arc::new(ChannelTransport::new(sender)));

    let alerts = vec![
        alert("first", vec![ChannelId::Slack]),
        alert("second", vec![ChannelId::Slack]),
    ];
    let report = dispatcher.dispatch(&alerts);

    assert_eq!(report.delivered_count(), 2);
    assert_eq!(receiver.recv().unwrap().name, "first");
    assert_eq!(receiver.recv().unwrap().name, "second");
}

#[test]
fn channel_transport_fails_after_receiver_drops() {
    let (sender, receiver) = mpsc::channel();
    drop(receiver);
    let mut dispatcher = AlertDispatcher::new();
    dispatcher.register(ChannelId::Slack, Arc::new(ChannelTransport::new(sender)));

    let report = dispatcher.dispatch(&[alert("orphaned", vec![ChannelId::Slack])]);

    assert!(matches!(report.outcomes[0].status, DeliveryStatus::Failed(_)));
}

#[test]
fn outcomes_carry_alert_and_channel_identity() {
    let mut dispatcher = AlertDispatcher::new();
    dispatcher.register(ChannelId::Email, Arc::new(succeeding()));

    let report = dispatcher.dispatch(&[alert("low_tps", vec![ChannelId::Email])]);

    assert_eq!(report.outcomes[0].alert, "low_tps");
    assert_eq!(report.outcomes[0].channel, ChannelId::Email);
}

#[test]
fn empty_batch_produces_empty_report() {
    let dispatcher = AlertDispatcher::new();
    let report = dispatcher.dispatch(&[]);
    assert!(report.outcomes.is_empty());
}
