// crates/loadgate-core/src/percentile.rs
// ============================================================================
// Module: Percentile Engine
// Description: Nearest-rank percentile computation over response-time samples.
// Purpose: Compute the p50/p95/p99 triple with fixed indexing rules.
// Dependencies: serde, std
// ============================================================================

//! ## Overview
//! Percentiles use the nearest-rank convention: sort ascending, take the
//! element at index `⌊n·95/100⌋` for p95 and `⌊n·99/100⌋` for p99. The p50 is
//! the statistical median (mean of the central pair for even `n`). The
//! indexing rule under- or over-estimates for small samples; it is preserved
//! exactly for compatibility with existing snapshots, not replaced by linear
//! interpolation. An empty sample yields all-zero percentiles by policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Percentile Triple
// ============================================================================

/// Computed response-time percentiles in milliseconds.
///
/// # Invariants
/// - Values are unrounded; rounding happens at the snapshot boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    /// 50th percentile (statistical median).
    pub p50: f64,
    /// 95th percentile (nearest-rank).
    pub p95: f64,
    /// 99th percentile (nearest-rank).
    pub p99: f64,
}

impl Percentiles {
    /// Computes the percentile triple for a response-time sample.
    ///
    /// The input order does not matter; a sorted copy is taken internally.
    /// An empty sample yields the all-zero triple.
    #[must_use]
    pub fn compute(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            p50: median(&sorted),
            p95: nearest_rank(&sorted, 95),
            p99: nearest_rank(&sorted, 99),
        }
    }
}

// ============================================================================
// SECTION: Rank Helpers
// ============================================================================

/// Returns the statistical median of a sorted, non-empty sample.
fn median(sorted: &[f64]) -> f64 {
    let len = sorted.len();
    let mid = len / 2;
    if len % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Returns the nearest-rank percentile of a sorted, non-empty sample.
///
/// The index is `⌊len·percent/100⌋`, computed in integer arithmetic so the
/// rule is exact, then clamped to the last element for the degenerate case
/// where the product reaches `len`.
fn nearest_rank(sorted: &[f64], percent: usize) -> f64 {
    let index = (sorted.len() * percent / 100).min(sorted.len() - 1);
    sorted[index]
}
