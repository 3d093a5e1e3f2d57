// crates/loadgate-core/src/bdd.rs
// ============================================================================
// Module: BDD Suite Summary
// Description: Scenario-level summary of the BDD engine's results feed.
// Purpose: Derive the suite success rate consumed by alert rules.
// Dependencies: serde, serde_json, thiserror, std
// ============================================================================

//! ## Overview
//! The BDD execution engine emits a JSON results feed: a list of features,
//! each with scenario elements, each with steps carrying a result status.
//! This module reduces the feed to [`BddMetrics`]. A scenario passes iff no
//! step failed. An absent results file means the suite did not run; callers
//! get `None` and downstream rule evaluation defaults the success rate to
//! 100.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::round2;

// ============================================================================
// SECTION: BDD Errors
// ============================================================================

/// Errors reading the BDD results feed.
#[derive(Debug, Error)]
pub enum BddError {
    /// Results file could not be read.
    #[error("bdd results read failed: {0}")]
    Io(String),
    /// Results feed could not be parsed.
    #[error("bdd results invalid: {0}")]
    Document(String),
}

// ============================================================================
// SECTION: Feed Types
// ============================================================================

/// One feature entry of the results feed.
#[derive(Debug, Deserialize)]
struct FeatureEntry {
    /// Scenario elements of the feature.
    #[serde(default)]
    elements: Vec<ScenarioEntry>,
}

/// One scenario entry of the results feed.
#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    /// Steps executed for the scenario.
    #[serde(default)]
    steps: Vec<StepEntry>,
}

/// One step entry of the results feed.
#[derive(Debug, Deserialize)]
struct StepEntry {
    /// Step result; absent for steps that never ran.
    #[serde(default)]
    result: Option<StepResult>,
}

/// Result block of a step entry.
#[derive(Debug, Deserialize)]
struct StepResult {
    /// Step status label (`passed`, `failed`, `skipped`, ...).
    #[serde(default)]
    status: String,
}

// ============================================================================
// SECTION: Suite Metrics
// ============================================================================

/// Scenario-level summary of one BDD suite run.
///
/// # Invariants
/// - `passed + failed == total_scenarios`.
/// - `success_rate` is 100.0 for an empty feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BddMetrics {
    /// Scenarios observed in the feed.
    pub total_scenarios: u64,
    /// Scenarios with no failed step.
    pub passed: u64,
    /// Scenarios with at least one failed step.
    pub failed: u64,
    /// Passing fraction, percent, rounded.
    pub success_rate: f64,
}

impl BddMetrics {
    /// Summarizes a parsed results feed.
    #[must_use]
    fn from_features(features: &[FeatureEntry]) -> Self {
        let mut total = 0_u64;
        let mut passed = 0_u64;
        for feature in features {
            for scenario in &feature.elements {
                total += 1;
                let failed_step =
                    scenario.steps.iter().any(|step| {
                        step.result.as_ref().is_some_and(|result| result.status == "failed")
                    });
                if !failed_step {
                    passed += 1;
                }
            }
        }
        let success_rate = if total == 0 {
            100.0
        } else {
            round2(crate::count_as_f64(passed) / crate::count_as_f64(total) * 100.0)
        };
        Self {
            total_scenarios: total,
            passed,
            failed: total - passed,
            success_rate,
        }
    }

    /// Summarizes a results feed read from any byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`BddError::Document`] when the feed is not valid JSON of the
    /// expected shape.
    pub fn from_results_bytes(bytes: &[u8]) -> Result<Self, BddError> {
        let features: Vec<FeatureEntry> =
            serde_json::from_slice(bytes).map_err(|err| BddError::Document(err.to_string()))?;
        Ok(Self::from_features(&features))
    }

    /// Summarizes a results feed on disk; absent files yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BddError`] for unreadable or invalid feeds that do exist.
    pub fn from_results_file(path: &Path) -> Result<Option<Self>, BddError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(BddError::Io(err.to_string())),
        };
        Self::from_results_bytes(&bytes).map(Some)
    }
}
