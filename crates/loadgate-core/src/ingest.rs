// crates/loadgate-core/src/ingest.rs
// ============================================================================
// Module: Stats Ingestor
// Description: Tabular load-test export parsing into raw request stats.
// Purpose: Produce per-run totals and the response-time sample, fail-soft.
// Dependencies: csv, thiserror, std
// ============================================================================

//! ## Overview
//! The ingestor reads the load generator's per-endpoint stats export (CSV
//! with `Type`, `Request Count`, `Failure Count`, `Average Response Time`
//! columns) and accumulates [`RawStats`]. Only `GET` and `POST` rows are
//! counted; other request kinds are ignored. A malformed numeric field skips
//! that row only, never the whole export, so partial exports still yield a
//! usable result. An absent export file yields the zero-valued result,
//! signaling "no data" to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of data rows accepted from a single export.
pub const MAX_STATS_ROWS: usize = 100_000;

/// Header label of the request-kind column.
const COLUMN_TYPE: &str = "Type";
/// Header label of the request-count column.
const COLUMN_REQUEST_COUNT: &str = "Request Count";
/// Header label of the failure-count column.
const COLUMN_FAILURE_COUNT: &str = "Failure Count";
/// Header label of the average-response-time column.
const COLUMN_AVG_RESPONSE_TIME: &str = "Average Response Time";

// ============================================================================
// SECTION: Ingest Errors
// ============================================================================

/// Errors aborting ingestion of a whole export.
///
/// Per-row faults are not represented here; malformed rows are skipped and
/// counted in [`RawStats::skipped_rows`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// Export file could not be read.
    #[error("stats export read failed: {0}")]
    Io(String),
    /// Export header is missing a required column.
    #[error("stats export missing required column: {0}")]
    MissingColumn(String),
    /// Export header could not be parsed.
    #[error("stats export header unreadable: {0}")]
    Header(String),
    /// Export exceeds the row limit.
    #[error("stats export exceeds row limit ({limit} rows)")]
    TooManyRows {
        /// Maximum accepted row count.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Request Kinds
// ============================================================================

/// Request kinds counted by the ingestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// HTTP GET endpoint row.
    Get,
    /// HTTP POST endpoint row.
    Post,
}

impl RequestKind {
    /// Parses a recognized request kind from an export field.
    ///
    /// Returns `None` for unrecognized kinds; those rows are ignored rather
    /// than counted.
    #[must_use]
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Observations
// ============================================================================

/// One parsed row of the stats export.
///
/// # Invariants
/// - Immutable once parsed; consumed exactly once by [`RawStats::absorb`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Request kind of the row.
    pub kind: RequestKind,
    /// Number of requests issued against the endpoint.
    pub request_count: u64,
    /// Number of failed requests.
    pub failure_count: u64,
    /// Average response time in milliseconds, absent when the export left
    /// the field empty.
    pub avg_response_ms: Option<f64>,
}

// ============================================================================
// SECTION: Raw Stats
// ============================================================================

/// Accumulated totals and response-time sample for one analysis run.
///
/// # Invariants
/// - `failed_requests <= total_requests`.
/// - `response_times` holds one entry per counted row with a present average.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStats {
    /// Total requests across counted rows.
    pub total_requests: u64,
    /// Total failed requests across counted rows.
    pub failed_requests: u64,
    /// Per-row average response times, in export order, milliseconds.
    pub response_times: Vec<f64>,
    /// Rows dropped for malformed numeric fields.
    pub skipped_rows: usize,
    /// Rows ignored for unrecognized request kinds.
    pub ignored_rows: usize,
}

impl RawStats {
    /// Folds one observation into the running totals.
    ///
    /// Totals saturate instead of overflowing so a crafted export with
    /// near-maximum counts stays fail-soft.
    pub fn absorb(&mut self, observation: Observation) {
        self.total_requests = self.total_requests.saturating_add(observation.request_count);
        self.failed_requests = self.failed_requests.saturating_add(observation.failure_count);
        if let Some(avg) = observation.avg_response_ms {
            self.response_times.push(avg);
        }
    }

    /// Returns true when no counted row contributed a response-time sample.
    #[must_use]
    pub fn is_empty_sample(&self) -> bool {
        self.response_times.is_empty()
    }
}

// ============================================================================
// SECTION: Ingestion
// ============================================================================

/// Column indexes resolved from the export header.
struct ColumnMap {
    /// Index of the request-kind column.
    kind: usize,
    /// Index of the request-count column.
    request_count: usize,
    /// Index of the failure-count column.
    failure_count: usize,
    /// Index of the average-response-time column.
    avg_response_time: usize,
}

impl ColumnMap {
    /// Resolves required columns from the header record.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::MissingColumn`] when a required column is
    /// absent.
    fn resolve(header: &StringRecord) -> Result<Self, IngestError> {
        let find = |label: &str| {
            header
                .iter()
                .position(|field| field == label)
                .ok_or_else(|| IngestError::MissingColumn(label.to_string()))
        };
        Ok(Self {
            kind: find(COLUMN_TYPE)?,
            request_count: find(COLUMN_REQUEST_COUNT)?,
            failure_count: find(COLUMN_FAILURE_COUNT)?,
            avg_response_time: find(COLUMN_AVG_RESPONSE_TIME)?,
        })
    }
}

/// Parses one data record into an observation.
///
/// Returns `Ok(None)` for rows with unrecognized request kinds and `Err(())`
/// for rows with malformed numeric fields; both leave the rest of the export
/// intact.
fn parse_record(record: &StringRecord, columns: &ColumnMap) -> Result<Option<Observation>, ()> {
    let kind_field = record.get(columns.kind).ok_or(())?;
    let Some(kind) = RequestKind::parse(kind_field) else {
        return Ok(None);
    };
    let request_count: u64 =
        record.get(columns.request_count).ok_or(())?.trim().parse().map_err(|_| ())?;
    let failure_count: u64 =
        record.get(columns.failure_count).ok_or(())?.trim().parse().map_err(|_| ())?;
    let avg_field = record.get(columns.avg_response_time).ok_or(())?.trim();
    let avg_response_ms = if avg_field.is_empty() {
        None
    } else {
        Some(avg_field.parse::<f64>().map_err(|_| ())?)
    };
    Ok(Some(Observation {
        kind,
        request_count,
        failure_count,
        avg_response_ms,
    }))
}

/// Ingests a stats export from any reader.
///
/// # Errors
///
/// Returns [`IngestError`] when the header is unreadable, a required column
/// is missing, or the export exceeds [`MAX_STATS_ROWS`]. Malformed rows are
/// skipped, not fatal.
pub fn ingest_csv_reader<R: Read>(reader: R) -> Result<RawStats, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let header = csv_reader
        .headers()
        .map_err(|err| IngestError::Header(err.to_string()))?
        .clone();
    let columns = ColumnMap::resolve(&header)?;

    let mut stats = RawStats::default();
    let mut rows = 0_usize;
    for record in csv_reader.records() {
        rows += 1;
        if rows > MAX_STATS_ROWS {
            return Err(IngestError::TooManyRows {
                limit: MAX_STATS_ROWS,
            });
        }
        let Ok(record) = record else {
            stats.skipped_rows += 1;
            continue;
        };
        match parse_record(&record, &columns) {
            Ok(Some(observation)) => stats.absorb(observation),
            Ok(None) => stats.ignored_rows += 1,
            Err(()) => stats.skipped_rows += 1,
        }
    }
    Ok(stats)
}

/// Ingests a stats export from disk.
///
/// An absent file yields the zero-valued [`RawStats`]; the empty sample is
/// the caller's "no data" signal.
///
/// # Errors
///
/// Returns [`IngestError`] for unreadable files that do exist, unreadable
/// headers, missing columns, or oversized exports.
pub fn ingest_csv_file(path: &Path) -> Result<RawStats, IngestError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(RawStats::default());
        }
        Err(err) => return Err(IngestError::Io(err.to_string())),
    };
    ingest_csv_reader(file)
}
