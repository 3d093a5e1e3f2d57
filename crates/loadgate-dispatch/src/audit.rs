// crates/loadgate-dispatch/src/audit.rs
// ============================================================================
// Module: Alert Audit Log
// Description: Append-only JSON record of every alert batch.
// Purpose: Keep a durable trail of fired alerts independent of delivery.
// Dependencies: loadgate-rules, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every evaluation run that fires at least one alert is appended to the
//! audit log as one JSON document on one line. The entry records the run
//! timestamp, the alert count, and the full alert records. Appends are a
//! single write so concurrent runs interleave at entry granularity, and a
//! delivery failure never suppresses the entry.
//! Invariants:
//! - One line per run; existing entries are never rewritten.
//! - Entry content is independent of dispatch outcomes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use loadgate_rules::AlertRecord;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted while appending to the alert audit log.
#[derive(Debug, Error)]
pub enum DispatchLogError {
    /// Filesystem failure while opening or writing the log.
    #[error("alert log I/O failure at '{path}': {source}")]
    Io {
        /// Log path involved in the failure.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Entry could not be serialized.
    #[error("alert log entry serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// SECTION: Log Entry
// ============================================================================

/// One audit log entry: a full alert batch from one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertLogEntry {
    /// RFC 3339 timestamp of the run.
    pub timestamp: String,
    /// Number of alerts in the batch.
    pub alerts_count: usize,
    /// The alert records themselves.
    pub alerts: Vec<AlertRecord>,
}

// ============================================================================
// SECTION: Alert Log
// ============================================================================

/// Append-only alert audit log backed by a JSON-lines file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertLog {
    /// Path of the log file.
    path: PathBuf,
}

impl AlertLog {
    /// Creates a log handle for the given path; the file is created lazily
    /// on first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Returns the log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry for a run that fired `alerts`.
    ///
    /// The entry is serialized first and written with a single call, so a
    /// serialization failure leaves the log untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchLogError`] when serialization or the append fails.
    pub fn append(&self, timestamp: &str, alerts: &[AlertRecord]) -> Result<(), DispatchLogError> {
        let entry = AlertLogEntry {
            timestamp: timestamp.to_string(),
            alerts_count: alerts.len(),
            alerts: alerts.to_vec(),
        };
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| DispatchLogError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| DispatchLogError::Io {
                path: self.path.clone(),
                source,
            })?;
        file.write_all(&line).map_err(|source| DispatchLogError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
