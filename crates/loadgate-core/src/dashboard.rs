// crates/loadgate-core/src/dashboard.rs
// ============================================================================
// Module: Dashboard Data
// Description: Display-oriented view of a metrics snapshot.
// Purpose: Feed static dashboards with per-indicator statuses and notices.
// Dependencies: serde, crate::gates, crate::snapshot
// ============================================================================

//! ## Overview
//! Dashboard data is a derived, display-only document. Each indicator block
//! carries its value, the threshold it is judged against, and a coarse
//! status. Threshold-breach notices repeat the failed gates in human-readable
//! form so the CI gate check can echo them. Nothing here feeds the overall
//! verdict.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::gates::GateThresholds;
use crate::snapshot::MetricsSnapshot;

// ============================================================================
// SECTION: Status Types
// ============================================================================

/// Coarse indicator status for dashboard color-coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorStatus {
    /// Indicator within threshold.
    Good,
    /// Indicator degraded but not blocking.
    Warning,
    /// Indicator breaching a blocking threshold.
    Critical,
}

/// Severity of a threshold-breach notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Breach of a blocking threshold.
    Critical,
    /// Breach of a degradation threshold.
    Warning,
}

impl NoticeLevel {
    /// Returns the uppercase label used in CLI output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
        }
    }
}

// ============================================================================
// SECTION: Dashboard Blocks
// ============================================================================

/// Throughput block of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TpsBlock {
    /// Rounded transactions per second.
    pub value: f64,
    /// Minimum-throughput threshold.
    pub threshold: f64,
    /// Block status.
    pub status: IndicatorStatus,
}

/// Latency block of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyBlock {
    /// Rounded p50 latency, milliseconds.
    pub p50: f64,
    /// Rounded p95 latency, milliseconds.
    pub p95: f64,
    /// Rounded p99 latency, milliseconds.
    pub p99: f64,
    /// Block status, judged on the p95 gate.
    pub status: IndicatorStatus,
}

/// Error block of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorBlock {
    /// Rounded error rate, percent.
    pub rate: f64,
    /// Maximum-error-rate threshold.
    pub threshold: f64,
    /// Block status.
    pub status: IndicatorStatus,
}

/// Indicator blocks grouped for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceBlocks {
    /// Throughput block.
    pub tps: TpsBlock,
    /// Latency block.
    pub latency: LatencyBlock,
    /// Error block.
    pub errors: ErrorBlock,
}

/// Human-readable threshold-breach notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardNotice {
    /// Notice severity.
    pub level: NoticeLevel,
    /// Rendered breach description.
    pub message: String,
}

/// Display-oriented document derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Indicator blocks.
    pub performance_metrics: PerformanceBlocks,
    /// Threshold-breach notices for failed gates.
    pub alerts: Vec<DashboardNotice>,
    /// Timestamp copied from the originating snapshot.
    pub timestamp: String,
}

impl DashboardData {
    /// Builds dashboard data from a snapshot and the thresholds it was
    /// judged against.
    #[must_use]
    pub fn from_snapshot(snapshot: &MetricsSnapshot, thresholds: &GateThresholds) -> Self {
        let gates = &snapshot.quality_gates;
        let blocks = PerformanceBlocks {
            tps: TpsBlock {
                value: snapshot.indicators.tps,
                threshold: thresholds.throughput_min_rps,
                status: if gates.throughput_passed {
                    IndicatorStatus::Good
                } else {
                    IndicatorStatus::Critical
                },
            },
            latency: LatencyBlock {
                p50: snapshot.response_times.p50,
                p95: snapshot.response_times.p95,
                p99: snapshot.response_times.p99,
                status: if gates.p95_passed {
                    IndicatorStatus::Good
                } else {
                    IndicatorStatus::Warning
                },
            },
            errors: ErrorBlock {
                rate: snapshot.summary.error_rate,
                threshold: thresholds.error_rate_max_pct,
                status: if gates.error_rate_passed {
                    IndicatorStatus::Good
                } else {
                    IndicatorStatus::Critical
                },
            },
        };

        let mut alerts = Vec::new();
        if !gates.throughput_passed {
            alerts.push(DashboardNotice {
                level: NoticeLevel::Critical,
                message: format!(
                    "TPS below threshold: {} < {}",
                    snapshot.indicators.tps, thresholds.throughput_min_rps
                ),
            });
        }
        if !gates.p95_passed {
            alerts.push(DashboardNotice {
                level: NoticeLevel::Warning,
                message: format!(
                    "P95 latency high: {}ms > {}ms",
                    snapshot.response_times.p95, thresholds.p95_max_ms
                ),
            });
        }
        if !gates.error_rate_passed {
            alerts.push(DashboardNotice {
                level: NoticeLevel::Critical,
                message: format!(
                    "Error rate high: {}% > {}%",
                    snapshot.summary.error_rate, thresholds.error_rate_max_pct
                ),
            });
        }

        Self {
            performance_metrics: blocks,
            alerts,
            timestamp: snapshot.timestamp.clone(),
        }
    }
}
