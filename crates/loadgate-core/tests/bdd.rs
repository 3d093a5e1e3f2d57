// crates/loadgate-core/tests/bdd.rs
// ============================================================================
// Module: BDD Summary Tests
// Description: Scenario pass/fail reduction of the results feed.
// Purpose: Verify the success-rate derivation used by alert rules.
// Dependencies: loadgate-core, serde_json, tempfile
// ============================================================================

//! Tests for the BDD suite summary.

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

use loadgate_core::BddMetrics;
use serde_json::json;

#[test]
fn scenario_with_a_failed_step_fails() {
    let feed = json!([
        {
            "name": "Login",
            "elements": [
                {
                    "name": "valid credentials",
                    "steps": [
                        { "result": { "status": "passed" } },
                        { "result": { "status": "passed" } }
                    ]
                },
                {
                    "name": "invalid credentials",
                    "steps": [
                        { "result": { "status": "passed" } },
                        { "result": { "status": "failed" } },
                        { "result": { "status": "skipped" } }
                    ]
                }
            ]
        }
    ]);
    let metrics = BddMetrics::from_results_bytes(&serde_json::to_vec(&feed).unwrap()).unwrap();
    assert_eq!(metrics.total_scenarios, 2);
    assert_eq!(metrics.passed, 1);
    assert_eq!(metrics.failed, 1);
    assert_eq!(metrics.success_rate, 50.0);
}

#[test]
fn steps_without_results_do_not_fail_the_scenario() {
    let feed = json!([
        { "elements": [ { "steps": [ {}, { "result": { "status": "passed" } } ] } ] }
    ]);
    let metrics = BddMetrics::from_results_bytes(&serde_json::to_vec(&feed).unwrap()).unwrap();
    assert_eq!(metrics.passed, 1);
    assert_eq!(metrics.success_rate, 100.0);
}

#[test]
fn empty_feed_defaults_to_full_success() {
    let metrics = BddMetrics::from_results_bytes(b"[]").unwrap();
    assert_eq!(metrics.total_scenarios, 0);
    assert_eq!(metrics.success_rate, 100.0);
}

#[test]
fn absent_results_file_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    let result = BddMetrics::from_results_file(&dir.path().join("behave-results.json")).unwrap();
    assert!(result.is_none());
}

#[test]
fn invalid_feed_is_an_error() {
    assert!(BddMetrics::from_results_bytes(b"{ not json").is_err());
}
