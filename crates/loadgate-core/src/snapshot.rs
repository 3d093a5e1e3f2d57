// crates/loadgate-core/src/snapshot.rs
// ============================================================================
// Module: Metrics Snapshot
// Description: Immutable aggregated metrics document for one analysis run.
// Purpose: Interchange format between the gate evaluator and consumers.
// Dependencies: serde, serde_json, thiserror, crate::gates
// ============================================================================

//! ## Overview
//! The snapshot is the JSON document produced once per analysis run and
//! consumed by the alert rule engine, the dashboard renderer, and the CI
//! gate checker. It is immutable after creation. All numeric fields are
//! rounded to two decimals here, at the boundary; the gate verdicts were
//! computed on unrounded values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::bdd::BddMetrics;
use crate::gates::GateEvaluation;
use crate::gates::Indicators;
use crate::gates::QualityGates;
use crate::ingest::RawStats;
use crate::round2;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum snapshot document size accepted on read, in bytes.
pub const MAX_SNAPSHOT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Snapshot Errors
// ============================================================================

/// Errors reading or writing snapshot documents.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot file does not exist. Callers decide whether this is fatal:
    /// the CI gate check treats it as pipeline misconfiguration, the alert
    /// monitor treats it as "nothing to monitor".
    #[error("snapshot file not found: {0}")]
    NotFound(String),
    /// Snapshot file could not be read or written.
    #[error("snapshot io failed: {0}")]
    Io(String),
    /// Snapshot document could not be parsed or serialized.
    #[error("snapshot document invalid: {0}")]
    Document(String),
    /// Snapshot file exceeds the size limit.
    #[error("snapshot file exceeds size limit ({limit} bytes)")]
    TooLarge {
        /// Maximum accepted document size.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Snapshot Types
// ============================================================================

/// Overall run verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    /// Every quality gate passed.
    Pass,
    /// At least one quality gate failed.
    Fail,
}

impl OverallStatus {
    /// Returns the status label used in documents and CLI output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

/// Request totals and derived rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Total requests counted from the export.
    pub total_requests: u64,
    /// Failed requests counted from the export.
    pub failed_requests: u64,
    /// Error rate, percent, rounded.
    pub error_rate: f64,
    /// Throughput, requests per second, rounded.
    pub throughput_rps: f64,
}

/// Rounded percentile triple as serialized in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimes {
    /// 50th percentile, milliseconds, rounded.
    pub p50: f64,
    /// 95th percentile, milliseconds, rounded.
    pub p95: f64,
    /// 99th percentile, milliseconds, rounded.
    pub p99: f64,
}

/// Aggregated metrics document for one analysis run.
///
/// # Invariants
/// - Immutable after creation.
/// - `overall_status` is `Pass` iff all five gates passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Creation time, RFC 3339.
    pub timestamp: String,
    /// Request totals and derived rates.
    pub summary: Summary,
    /// Rounded percentile triple.
    pub response_times: ResponseTimes,
    /// Five gate verdicts.
    pub quality_gates: QualityGates,
    /// Display-only indicators.
    pub indicators: Indicators,
    /// Overall run verdict.
    pub overall_status: OverallStatus,
    /// Optional BDD suite metrics merged into the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bdd_metrics: Option<BddMetrics>,
}

impl MetricsSnapshot {
    /// Assembles the snapshot from raw stats, percentiles, and gate results.
    ///
    /// The caller supplies the timestamp; the core never reads wall-clock
    /// time.
    #[must_use]
    pub fn build(
        raw: &RawStats,
        percentiles: &crate::percentile::Percentiles,
        evaluation: &GateEvaluation,
        timestamp: String,
    ) -> Self {
        let overall_status = if evaluation.gates.all_passed() {
            OverallStatus::Pass
        } else {
            OverallStatus::Fail
        };
        Self {
            timestamp,
            summary: Summary {
                total_requests: raw.total_requests,
                failed_requests: raw.failed_requests,
                error_rate: round2(evaluation.error_rate),
                throughput_rps: round2(evaluation.throughput),
            },
            response_times: ResponseTimes {
                p50: round2(percentiles.p50),
                p95: round2(percentiles.p95),
                p99: round2(percentiles.p99),
            },
            quality_gates: evaluation.gates,
            indicators: evaluation.indicators,
            overall_status,
            bdd_metrics: None,
        }
    }

    /// Attaches BDD suite metrics to the snapshot.
    #[must_use]
    pub fn with_bdd_metrics(mut self, metrics: Option<BddMetrics>) -> Self {
        self.bdd_metrics = metrics;
        self
    }

    /// Writes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when serialization or the write fails.
    pub fn write_json(&self, path: &Path) -> Result<(), SnapshotError> {
        write_json_document(path, self)
    }

    /// Reads a snapshot document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::NotFound`] for an absent file and other
    /// [`SnapshotError`] variants for unreadable or invalid documents.
    pub fn read_json(path: &Path) -> Result<Self, SnapshotError> {
        let bytes = read_json_bytes(path)?;
        serde_json::from_slice(&bytes).map_err(|err| SnapshotError::Document(err.to_string()))
    }
}

// ============================================================================
// SECTION: Document Helpers
// ============================================================================

/// Writes any serializable value as a pretty-printed JSON document.
///
/// # Errors
///
/// Returns [`SnapshotError`] when serialization or the filesystem write
/// fails.
pub fn write_json_document<T: Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| SnapshotError::Io(err.to_string()))?;
    }
    let mut bytes =
        serde_json::to_vec_pretty(value).map_err(|err| SnapshotError::Document(err.to_string()))?;
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|err| SnapshotError::Io(err.to_string()))
}

/// Reads a JSON document with the snapshot size limit applied.
fn read_json_bytes(path: &Path) -> Result<Vec<u8>, SnapshotError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(SnapshotError::NotFound(path.display().to_string()));
        }
        Err(err) => return Err(SnapshotError::Io(err.to_string())),
    };
    if bytes.len() > MAX_SNAPSHOT_BYTES {
        return Err(SnapshotError::TooLarge {
            limit: MAX_SNAPSHOT_BYTES,
        });
    }
    Ok(bytes)
}
