// crates/loadgate-core/src/gates.rs
// ============================================================================
// Module: Quality Gate Evaluator
// Description: Threshold gates over derived load-test metrics.
// Purpose: Produce five pass/fail gates, derived rates, and display indicators.
// Dependencies: serde, crate::percentile
// ============================================================================

//! ## Overview
//! The evaluator derives error rate and throughput from the raw totals,
//! compares the unrounded values against [`GateThresholds`], and reports five
//! independent boolean gates. The overall verdict is PASS iff all five gates
//! pass; there is no partial credit. Gate comparisons are inclusive
//! (`<=`/`>=`), so a run sitting exactly on a threshold passes.
//!
//! Throughput assumes a fixed one-minute observation window
//! ([`THROUGHPUT_WINDOW_SECS`]). This mirrors the export's known test
//! duration; it is a documented limitation, not a tunable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::count_as_f64;
use crate::ingest::RawStats;
use crate::percentile::Percentiles;
use crate::round2;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed observation window used for throughput derivation, in seconds.
pub const THROUGHPUT_WINDOW_SECS: f64 = 60.0;

/// Fixed concurrent-user count reported in display indicators.
pub const CONCURRENT_USERS: u32 = 50;

// ============================================================================
// SECTION: Thresholds
// ============================================================================

/// Fixed thresholds the five quality gates compare against.
///
/// # Invariants
/// - Latency and error-rate gates pass at values `<=` their threshold.
/// - The throughput gate passes at values `>=` its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateThresholds {
    /// Maximum accepted p50 response time, milliseconds.
    pub p50_max_ms: f64,
    /// Maximum accepted p95 response time, milliseconds.
    pub p95_max_ms: f64,
    /// Maximum accepted p99 response time, milliseconds.
    pub p99_max_ms: f64,
    /// Maximum accepted error rate, percent.
    pub error_rate_max_pct: f64,
    /// Minimum accepted throughput, requests per second.
    pub throughput_min_rps: f64,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            p50_max_ms: 500.0,
            p95_max_ms: 1500.0,
            p99_max_ms: 3000.0,
            error_rate_max_pct: 5.0,
            throughput_min_rps: 10.0,
        }
    }
}

// ============================================================================
// SECTION: Gate Results
// ============================================================================

/// Pass/fail result of each quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityGates {
    /// p50 latency gate.
    pub p50_passed: bool,
    /// p95 latency gate.
    pub p95_passed: bool,
    /// p99 latency gate.
    pub p99_passed: bool,
    /// Error-rate gate.
    pub error_rate_passed: bool,
    /// Throughput gate.
    pub throughput_passed: bool,
}

impl QualityGates {
    /// Returns true iff every gate passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.p50_passed
            && self.p95_passed
            && self.p99_passed
            && self.error_rate_passed
            && self.throughput_passed
    }

    /// Returns the number of passing gates.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.named_results().iter().filter(|(_, passed)| *passed).count()
    }

    /// Returns the total number of gates.
    #[must_use]
    pub const fn gate_count(&self) -> usize {
        5
    }

    /// Returns gate names with their pass/fail results, in display order.
    #[must_use]
    pub fn named_results(&self) -> [(&'static str, bool); 5] {
        [
            ("p50_passed", self.p50_passed),
            ("p95_passed", self.p95_passed),
            ("p99_passed", self.p99_passed),
            ("error_rate_passed", self.error_rate_passed),
            ("throughput_passed", self.throughput_passed),
        ]
    }
}

// ============================================================================
// SECTION: Display Indicators
// ============================================================================

/// Display-only indicators derived alongside the gates.
///
/// # Invariants
/// - Indicators never feed the gate verdict; they exist for dashboards.
/// - Values are rounded to two decimals at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    /// Transactions per second, rounded.
    #[serde(rename = "TPS")]
    pub tps: f64,
    /// Mean of the response-time sample, milliseconds, rounded.
    pub avg_latency_ms: f64,
    /// Error rate, percent, rounded.
    pub error_pct: f64,
    /// Fixed concurrent-user count of the load scenario.
    pub concurrent_users: u32,
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Full output of one gate evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct GateEvaluation {
    /// Derived error rate, percent, unrounded.
    pub error_rate: f64,
    /// Derived throughput, requests per second, unrounded.
    pub throughput: f64,
    /// Five gate results.
    pub gates: QualityGates,
    /// Display indicators.
    pub indicators: Indicators,
}

/// Derives the error rate in percent; zero when no requests were counted.
#[must_use]
pub fn derive_error_rate(total_requests: u64, failed_requests: u64) -> f64 {
    if total_requests == 0 {
        return 0.0;
    }
    count_as_f64(failed_requests) / count_as_f64(total_requests) * 100.0
}

/// Derives throughput over the fixed one-minute window.
#[must_use]
pub fn derive_throughput(total_requests: u64) -> f64 {
    count_as_f64(total_requests) / THROUGHPUT_WINDOW_SECS
}

/// Returns the mean of the response-time sample; zero for an empty sample.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    reason = "Sample counts stay far below the 2^53 precision limit."
)]
fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Evaluates the five quality gates over raw stats and computed percentiles.
///
/// Comparisons run against unrounded values; the indicators are rounded for
/// display at construction.
#[must_use]
pub fn evaluate(
    raw: &RawStats,
    percentiles: &Percentiles,
    thresholds: &GateThresholds,
) -> GateEvaluation {
    let error_rate = derive_error_rate(raw.total_requests, raw.failed_requests);
    let throughput = derive_throughput(raw.total_requests);
    let gates = QualityGates {
        p50_passed: percentiles.p50 <= thresholds.p50_max_ms,
        p95_passed: percentiles.p95 <= thresholds.p95_max_ms,
        p99_passed: percentiles.p99 <= thresholds.p99_max_ms,
        error_rate_passed: error_rate <= thresholds.error_rate_max_pct,
        throughput_passed: throughput >= thresholds.throughput_min_rps,
    };
    let indicators = Indicators {
        tps: round2(throughput),
        avg_latency_ms: round2(mean(&raw.response_times)),
        error_pct: round2(error_rate),
        concurrent_users: CONCURRENT_USERS,
    };
    GateEvaluation {
        error_rate,
        throughput,
        gates,
        indicators,
    }
}
