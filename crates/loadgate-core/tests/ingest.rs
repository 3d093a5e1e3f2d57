// crates/loadgate-core/tests/ingest.rs
// ============================================================================
// Module: Stats Ingestor Tests
// Description: Row-level fault isolation and missing-input behavior.
// Purpose: Verify skip-not-abort semantics for malformed exports.
// Dependencies: loadgate-core, tempfile
// ============================================================================

//! Tests for the stats ingestor's fail-soft row handling.

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

use loadgate_core::IngestError;
use loadgate_core::ingest::ingest_csv_file;
use loadgate_core::ingest::ingest_csv_reader;

/// Standard export header used by the fixtures.
const HEADER: &str = "Type,Name,Request Count,Failure Count,Average Response Time\n";

#[test]
fn counts_get_and_post_rows_only() {
    let export = format!(
        "{HEADER}GET,Login,100,2,120.5\nPOST,Login,200,8,340.0\nAggregated,,300,10,200.0\n"
    );
    let stats = ingest_csv_reader(export.as_bytes()).unwrap();
    assert_eq!(stats.total_requests, 300);
    assert_eq!(stats.failed_requests, 10);
    assert_eq!(stats.response_times, vec![120.5, 340.0]);
    assert_eq!(stats.ignored_rows, 1);
    assert_eq!(stats.skipped_rows, 0);
}

#[test]
fn malformed_row_is_skipped_not_fatal() {
    // The middle row has a non-numeric response time; rows before and after
    // must still be counted.
    let export = format!(
        "{HEADER}GET,Login,100,2,120.5\nPOST,Login,200,8,not-a-number\nGET,Session,50,0,80.0\n"
    );
    let stats = ingest_csv_reader(export.as_bytes()).unwrap();
    assert_eq!(stats.total_requests, 150);
    assert_eq!(stats.failed_requests, 2);
    assert_eq!(stats.response_times, vec![120.5, 80.0]);
    assert_eq!(stats.skipped_rows, 1);
}

#[test]
fn malformed_count_skips_whole_row() {
    let export = format!("{HEADER}GET,Login,oops,2,120.5\nPOST,Login,200,8,340.0\n");
    let stats = ingest_csv_reader(export.as_bytes()).unwrap();
    assert_eq!(stats.total_requests, 200);
    assert_eq!(stats.skipped_rows, 1);
}

#[test]
fn near_maximum_counts_saturate_instead_of_overflowing() {
    let max = u64::MAX;
    let export = format!("{HEADER}GET,Login,{max},{max},120.5\nPOST,Login,200,8,340.0\n");
    let stats = ingest_csv_reader(export.as_bytes()).unwrap();
    assert_eq!(stats.total_requests, u64::MAX);
    assert_eq!(stats.failed_requests, u64::MAX);
    assert_eq!(stats.response_times, vec![120.5, 340.0]);
}

#[test]
fn absent_average_keeps_counts_but_not_sample() {
    let export = format!("{HEADER}GET,Login,100,2,\n");
    let stats = ingest_csv_reader(export.as_bytes()).unwrap();
    assert_eq!(stats.total_requests, 100);
    assert!(stats.response_times.is_empty());
    assert_eq!(stats.skipped_rows, 0);
}

#[test]
fn missing_required_column_is_fatal() {
    let export = "Type,Name,Request Count,Failure Count\nGET,Login,100,2\n";
    let error = ingest_csv_reader(export.as_bytes()).unwrap_err();
    assert!(matches!(error, IngestError::MissingColumn(column) if column == "Average Response Time"));
}

#[test]
fn absent_export_file_yields_zero_result() {
    let dir = tempfile::tempdir().unwrap();
    let stats = ingest_csv_file(&dir.path().join("does-not-exist.csv")).unwrap();
    assert_eq!(stats.total_requests, 0);
    assert!(stats.is_empty_sample());
}

#[test]
fn export_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.csv");
    std::fs::write(&path, format!("{HEADER}GET,Login,10,1,55.0\n")).unwrap();
    let stats = ingest_csv_file(&path).unwrap();
    assert_eq!(stats.total_requests, 10);
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.response_times, vec![55.0]);
}
