// crates/loadgate-core/src/lib.rs
// ============================================================================
// Module: Loadgate Core Library
// Description: Metrics pipeline primitives for load-test analysis.
// Purpose: Ingest raw stats, compute percentiles, evaluate quality gates.
// Dependencies: csv, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Loadgate Core implements the analysis half of the pipeline: the stats
//! ingestor parses a tabular load-test export into [`RawStats`], the
//! percentile engine computes [`Percentiles`] over the response-time sample,
//! and the quality-gate evaluator derives a [`MetricsSnapshot`] with five
//! pass/fail gates and an overall status.
//! Invariants:
//! - `failed_requests <= total_requests` in every ingested result.
//! - Empty samples yield all-zero percentiles by policy, never an error.
//! - Numeric outputs are rounded to two decimals only at the snapshot
//!   boundary, never internally.
//!
//! The core never reads wall-clock time; callers supply timestamps.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bdd;
pub mod dashboard;
pub mod gates;
pub mod ingest;
pub mod percentile;
pub mod snapshot;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bdd::BddError;
pub use bdd::BddMetrics;
pub use dashboard::DashboardData;
pub use dashboard::DashboardNotice;
pub use dashboard::IndicatorStatus;
pub use dashboard::NoticeLevel;
pub use gates::CONCURRENT_USERS;
pub use gates::GateEvaluation;
pub use gates::GateThresholds;
pub use gates::Indicators;
pub use gates::QualityGates;
pub use gates::THROUGHPUT_WINDOW_SECS;
pub use ingest::IngestError;
pub use ingest::MAX_STATS_ROWS;
pub use ingest::Observation;
pub use ingest::RawStats;
pub use ingest::RequestKind;
pub use percentile::Percentiles;
pub use snapshot::MetricsSnapshot;
pub use snapshot::OverallStatus;
pub use snapshot::ResponseTimes;
pub use snapshot::SnapshotError;
pub use snapshot::Summary;

// ============================================================================
// SECTION: Rounding Helpers
// ============================================================================

/// Rounds a value to two decimal places for boundary output.
///
/// Internal computations keep full precision; only serialized documents and
/// rendered messages pass through this helper.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a request count to `f64` for rate derivations.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    reason = "Request counts stay far below the 2^53 precision limit."
)]
pub(crate) fn count_as_f64(value: u64) -> f64 {
    value as f64
}
