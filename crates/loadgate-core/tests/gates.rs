// crates/loadgate-core/tests/gates.rs
// ============================================================================
// Module: Quality Gate Tests
// Description: Threshold boundary and overall-status semantics.
// Purpose: Verify inclusive boundaries and all-gates-pass status derivation.
// Dependencies: loadgate-core
// ============================================================================

//! Tests for gate derivations, boundaries, and the overall verdict.

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

use loadgate_core::GateThresholds;
use loadgate_core::MetricsSnapshot;
use loadgate_core::OverallStatus;
use loadgate_core::Percentiles;
use loadgate_core::RawStats;
use loadgate_core::gates;

/// Raw stats that pass every gate under default thresholds.
fn healthy_stats() -> RawStats {
    RawStats {
        total_requests: 1000,
        failed_requests: 10,
        response_times: vec![100.0, 200.0, 300.0],
        skipped_rows: 0,
        ignored_rows: 0,
    }
}

/// Evaluates stats against default thresholds.
fn evaluate(raw: &RawStats) -> gates::GateEvaluation {
    let percentiles = Percentiles::compute(&raw.response_times);
    gates::evaluate(raw, &percentiles, &GateThresholds::default())
}

#[test]
fn error_rate_boundary_passes_at_exactly_five_percent() {
    let mut raw = healthy_stats();
    raw.failed_requests = 50;
    let evaluation = evaluate(&raw);
    assert_eq!(evaluation.error_rate, 5.0);
    assert!(evaluation.gates.error_rate_passed);
}

#[test]
fn error_rate_fails_just_past_the_boundary() {
    let mut raw = healthy_stats();
    raw.failed_requests = 51;
    let evaluation = evaluate(&raw);
    assert!(!evaluation.gates.error_rate_passed);
}

#[test]
fn zero_requests_derive_zero_rates() {
    let raw = RawStats::default();
    let evaluation = evaluate(&raw);
    assert_eq!(evaluation.error_rate, 0.0);
    assert_eq!(evaluation.throughput, 0.0);
    assert!(evaluation.gates.error_rate_passed);
    assert!(!evaluation.gates.throughput_passed);
}

#[test]
fn throughput_uses_the_fixed_sixty_second_window() {
    let raw = healthy_stats();
    let evaluation = evaluate(&raw);
    assert_eq!(evaluation.throughput, 1000.0 / 60.0);
    assert!(evaluation.gates.throughput_passed);
}

#[test]
fn each_gate_toggles_overall_status_independently() {
    // Baseline passes everything; each variation trips exactly one gate.
    let baseline = healthy_stats();
    assert!(evaluate(&baseline).gates.all_passed());

    let mut p50_fail = healthy_stats();
    p50_fail.response_times = vec![600.0, 600.0, 600.0];
    let gates = evaluate(&p50_fail).gates;
    assert!(!gates.p50_passed);
    assert!(!gates.all_passed());

    let mut p95_fail = healthy_stats();
    p95_fail.response_times = vec![100.0, 100.0, 1600.0];
    let gates = evaluate(&p95_fail).gates;
    assert!(gates.p50_passed);
    assert!(!gates.p95_passed);
    assert!(!gates.all_passed());

    // 100 samples: rank 95 stays at 100ms while rank 99 breaches the p99
    // threshold, so only the p99 gate trips.
    let mut p99_fail = healthy_stats();
    p99_fail.response_times = vec![100.0; 99];
    p99_fail.response_times.push(3500.0);
    let gates = evaluate(&p99_fail).gates;
    assert!(gates.p95_passed);
    assert!(!gates.p99_passed);
    assert!(!gates.all_passed());

    let mut error_fail = healthy_stats();
    error_fail.failed_requests = 100;
    let gates = evaluate(&error_fail).gates;
    assert!(!gates.error_rate_passed);
    assert!(!gates.all_passed());

    let mut throughput_fail = healthy_stats();
    throughput_fail.total_requests = 300;
    throughput_fail.failed_requests = 0;
    let gates = evaluate(&throughput_fail).gates;
    assert!(!gates.throughput_passed);
    assert!(!gates.all_passed());
}

#[test]
fn indicators_are_rounded_and_display_only() {
    let raw = healthy_stats();
    let evaluation = evaluate(&raw);
    assert_eq!(evaluation.indicators.tps, 16.67);
    assert_eq!(evaluation.indicators.avg_latency_ms, 200.0);
    assert_eq!(evaluation.indicators.error_pct, 1.0);
    assert_eq!(evaluation.indicators.concurrent_users, gates::CONCURRENT_USERS);
}

#[test]
fn snapshot_status_follows_the_gates() {
    let raw = healthy_stats();
    let percentiles = Percentiles::compute(&raw.response_times);
    let evaluation = gates::evaluate(&raw, &percentiles, &GateThresholds::default());
    let snapshot = MetricsSnapshot::build(
        &raw,
        &percentiles,
        &evaluation,
        "2026-08-26T00:00:00Z".to_string(),
    );
    assert_eq!(snapshot.overall_status, OverallStatus::Pass);

    let mut failing = healthy_stats();
    failing.failed_requests = 100;
    let percentiles = Percentiles::compute(&failing.response_times);
    let evaluation = gates::evaluate(&failing, &percentiles, &GateThresholds::default());
    let snapshot = MetricsSnapshot::build(
        &failing,
        &percentiles,
        &evaluation,
        "2026-08-26T00:00:00Z".to_string(),
    );
    assert_eq!(snapshot.overall_status, OverallStatus::Fail);
    assert_eq!(snapshot.quality_gates.passed_count(), 4);
}
