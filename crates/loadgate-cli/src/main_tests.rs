// crates/loadgate-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for the CI verdict helpers in the CLI entry point.
// Purpose: Ensure the exit-code contract matches the gate outcomes.
// Dependencies: loadgate-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the gate success rate and CI acceptance helpers that back the
//! `gates` exit-code contract.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use loadgate_core::QualityGates;

use super::ci_accepts;
use super::gate_success_rate;
use super::verdict_label;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// All five gates passing.
const fn all_pass() -> QualityGates {
    QualityGates {
        p50_passed: true,
        p95_passed: true,
        p99_passed: true,
        error_rate_passed: true,
        throughput_passed: true,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn full_pass_meets_the_ci_contract() {
    let gates = all_pass();
    assert_eq!(gate_success_rate(&gates), 100.0);
    assert!(ci_accepts(&gates));
}

#[test]
fn one_failed_gate_fails_the_ci_contract() {
    let mut gates = all_pass();
    gates.p99_passed = false;
    // 4/5 meets the 80% floor, but the overall verdict still gates CI.
    assert_eq!(gate_success_rate(&gates), 80.0);
    assert!(!ci_accepts(&gates));
}

#[test]
fn all_failed_gates_rate_is_zero() {
    let gates = QualityGates {
        p50_passed: false,
        p95_passed: false,
        p99_passed: false,
        error_rate_passed: false,
        throughput_passed: false,
    };
    assert_eq!(gate_success_rate(&gates), 0.0);
    assert!(!ci_accepts(&gates));
}

#[test]
fn verdict_labels_are_stable() {
    assert_eq!(verdict_label(true), "PASS");
    assert_eq!(verdict_label(false), "FAIL");
}
