// crates/loadgate-config/tests/config_validation.rs
// ============================================================================
// Module: Config Validation Tests
// Description: TOML loading, defaults, and validation failures.
// Purpose: Verify strict config parsing and the fallback-to-defaults rule.
// Dependencies: loadgate-config, loadgate-rules, tempfile
// ============================================================================

//! Tests for configuration loading and validation.

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

use std::fs;
use std::path::PathBuf;

use loadgate_config::ConfigError;
use loadgate_config::LoadgateConfig;
use loadgate_rules::ChannelId;
use loadgate_rules::Severity;

/// Writes `content` to a temp file and returns the guard plus the path.
fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loadgate.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

/// A fully populated, valid configuration document.
const FULL_CONFIG: &str = r#"
[thresholds]
p95_max_ms = 1200.0
throughput_min_rps = 20.0

[[rules]]
name = "slow_p95"
severity = "critical"
condition = "response_time_p95 > 2000"
message = "p95 is {response_time_p95}ms"
channels = ["slack", "email"]

[[rules]]
name = "high_errors"
severity = "warning"
condition = "error_rate > 5 and throughput < 50"
message = "errors at {error_rate}%"
channels = ["slack"]

[channels.webhook]
timeout_ms = 5000

[channels.email]
smtp_server = "smtp.example.com"
recipients = ["oncall@example.com"]
"#;

#[test]
fn full_config_loads_and_converts_to_rules() {
    let (_dir, path) = write_config(FULL_CONFIG);
    let config = LoadgateConfig::load(Some(&path)).unwrap();

    assert_eq!(config.thresholds.p95_max_ms, 1200.0);
    assert_eq!(config.thresholds.throughput_min_rps, 20.0);
    // Unspecified thresholds keep their defaults.
    assert_eq!(config.thresholds.p50_max_ms, 500.0);

    let rules = config.to_rules();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].name, "slow_p95");
    assert_eq!(rules[0].severity, Severity::Critical);
    assert_eq!(rules[0].channels, vec![ChannelId::Slack, ChannelId::Email]);
    assert_eq!(rules[1].severity, Severity::Warning);

    assert!(config.channels.webhook.is_some());
    assert_eq!(
        config.channels.email.as_ref().unwrap().smtp_server,
        "smtp.example.com"
    );
}

#[test]
fn empty_document_yields_defaults() {
    let (_dir, path) = write_config("");
    let config = LoadgateConfig::load(Some(&path)).unwrap();
    assert_eq!(config.thresholds.p95_max_ms, 1500.0);
    assert!(config.rules.is_empty());
    assert!(config.channels.webhook.is_none());
    assert!(config.channels.email.is_none());
}

#[test]
fn explicit_missing_path_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = LoadgateConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let (_dir, path) = write_config("[[rules]\nname = ");
    let err = LoadgateConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn unparsable_rule_condition_is_rejected_at_load_time() {
    let (_dir, path) = write_config(
        r#"
[[rules]]
name = "broken"
severity = "critical"
condition = "response_time_p95 >"
message = "never fires"
channels = ["slack"]
"#,
    );
    let err = LoadgateConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("broken"));
}

#[test]
fn unknown_condition_variable_is_rejected() {
    let (_dir, path) = write_config(
        r#"
[[rules]]
name = "typo"
severity = "warning"
condition = "respnse_time_p95 > 2000"
message = "typo'd"
channels = ["slack"]
"#,
    );
    assert!(LoadgateConfig::load(Some(&path)).is_err());
}

#[test]
fn duplicate_rule_names_are_rejected() {
    let (_dir, path) = write_config(
        r#"
[[rules]]
name = "dup"
severity = "warning"
condition = "error_rate > 5"
message = "a"
channels = ["slack"]

[[rules]]
name = "dup"
severity = "critical"
condition = "error_rate > 10"
message = "b"
channels = ["slack"]
"#,
    );
    let err = LoadgateConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn rule_without_channels_is_rejected() {
    let (_dir, path) = write_config(
        r#"
[[rules]]
name = "nowhere"
severity = "info"
condition = "error_rate > 5"
message = "no destination"
channels = []
"#,
    );
    assert!(LoadgateConfig::load(Some(&path)).is_err());
}

#[test]
fn unknown_channel_name_is_rejected() {
    let (_dir, path) = write_config(
        r#"
[[rules]]
name = "pager"
severity = "critical"
condition = "error_rate > 5"
message = "page"
channels = ["pagerduty"]
"#,
    );
    assert!(matches!(
        LoadgateConfig::load(Some(&path)).unwrap_err(),
        ConfigError::Parse(_)
    ));
}

#[test]
fn out_of_range_webhook_timeout_is_rejected() {
    let (_dir, path) = write_config(
        r#"
[channels.webhook]
timeout_ms = 5
"#,
    );
    assert!(LoadgateConfig::load(Some(&path)).is_err());
}

#[test]
fn email_without_recipients_is_rejected() {
    let (_dir, path) = write_config(
        r#"
[channels.email]
smtp_server = "smtp.example.com"
recipients = []
"#,
    );
    assert!(LoadgateConfig::load(Some(&path)).is_err());
}
