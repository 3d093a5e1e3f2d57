// crates/loadgate-cli/src/main.rs
// ============================================================================
// Module: Loadgate CLI Entry Point
// Description: Command dispatcher for analysis, gate checks, and alerting.
// Purpose: Drive the metrics pipeline from load-test export to CI verdict.
// Dependencies: clap, loadgate-config, loadgate-core, loadgate-dispatch,
//               loadgate-rules, thiserror, time
// ============================================================================

//! ## Overview
//! The Loadgate CLI runs the performance pipeline in three stages that CI
//! invokes independently: `analyze` turns a load-test CSV export into a
//! metrics snapshot, `gates` re-reads a snapshot and renders the CI verdict,
//! and `alerts` evaluates alert rules over a snapshot and dispatches fired
//! alerts. Exit codes carry the contract: `gates` exits zero only when every
//! gate passed and the gate success rate meets the CI minimum.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use loadgate_config::LoadgateConfig;
use loadgate_core::BddMetrics;
use loadgate_core::DashboardData;
use loadgate_core::MetricsSnapshot;
use loadgate_core::Percentiles;
use loadgate_core::QualityGates;
use loadgate_core::SnapshotError;
use loadgate_core::gates;
use loadgate_core::ingest::ingest_csv_file;
use loadgate_core::snapshot::write_json_document;
use loadgate_dispatch::AlertDispatcher;
use loadgate_dispatch::DeliveryStatus;
use loadgate_dispatch::DispatchReport;
use loadgate_dispatch::EmailSettings;
use loadgate_dispatch::EmailTransport;
use loadgate_dispatch::Transport;
use loadgate_dispatch::TransportError;
use loadgate_dispatch::WebhookSettings;
use loadgate_dispatch::WebhookTransport;
use loadgate_dispatch::audit::AlertLog;
use loadgate_rules::ChannelId;
use loadgate_rules::MetricsScope;
use loadgate_rules::RuleEngine;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum gate success rate, in percent, for a zero exit from `gates`.
const CI_MIN_GATE_SUCCESS_PCT: f64 = 80.0;
/// Default metrics snapshot path shared by the three commands.
const DEFAULT_METRICS_PATH: &str = "loadgate-metrics.json";
/// Default alert audit log path.
const DEFAULT_ALERT_LOG_PATH: &str = "alerts.log";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "loadgate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a load-test CSV export into a metrics snapshot.
    Analyze(AnalyzeCommand),
    /// Check quality gates from a metrics snapshot and render the CI verdict.
    Gates(GatesCommand),
    /// Evaluate alert rules over a metrics snapshot and dispatch alerts.
    Alerts(AlertsCommand),
}

/// Configuration for the `analyze` command.
#[derive(Args, Debug)]
struct AnalyzeCommand {
    /// Load-test statistics CSV export.
    #[arg(long, value_name = "PATH")]
    stats: PathBuf,
    /// Output path for the metrics snapshot.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_METRICS_PATH)]
    out: PathBuf,
    /// Optional output path for the dashboard data document.
    #[arg(long, value_name = "PATH")]
    dashboard_out: Option<PathBuf>,
    /// Optional BDD results JSON to merge into the snapshot.
    #[arg(long, value_name = "PATH")]
    bdd_results: Option<PathBuf>,
    /// Optional config file path (defaults to loadgate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Configuration for the `gates` command.
#[derive(Args, Debug)]
struct GatesCommand {
    /// Metrics snapshot produced by `analyze`.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_METRICS_PATH)]
    metrics: PathBuf,
    /// Optional output path for the dashboard data document.
    #[arg(long, value_name = "PATH")]
    dashboard: Option<PathBuf>,
    /// Optional config file path (defaults to loadgate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Configuration for the `alerts` command.
#[derive(Args, Debug)]
struct AlertsCommand {
    /// Metrics snapshot produced by `analyze`.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_METRICS_PATH)]
    metrics: PathBuf,
    /// Optional config file path (defaults to loadgate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Alert audit log path; fired alerts are recorded here regardless of
    /// delivery outcome.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ALERT_LOG_PATH)]
    log: PathBuf,
    /// Evaluate rules and write the audit log without delivering alerts.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a rendered message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        emit_stdout(&format!("loadgate {version}"))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        emit_stdout("usage: loadgate <analyze|gates|alerts> [options]")?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Analyze(command) => command_analyze(&command),
        Commands::Gates(command) => command_gates(&command),
        Commands::Alerts(command) => command_alerts(&command),
    }
}

// ============================================================================
// SECTION: Analyze Command
// ============================================================================

/// Executes the `analyze` command.
fn command_analyze(command: &AnalyzeCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let raw = ingest_csv_file(&command.stats)
        .map_err(|err| CliError::new(format!("stats ingest failed: {err}")))?;
    if raw.skipped_rows > 0 {
        emit_stderr(&format!("skipped {} malformed stats row(s)", raw.skipped_rows))?;
    }
    let percentiles = Percentiles::compute(&raw.response_times);
    let evaluation = gates::evaluate(&raw, &percentiles, &config.thresholds);
    let bdd = match &command.bdd_results {
        Some(path) => BddMetrics::from_results_file(path)
            .map_err(|err| CliError::new(format!("bdd results failed: {err}")))?,
        None => None,
    };
    let snapshot = MetricsSnapshot::build(&raw, &percentiles, &evaluation, now_rfc3339()?)
        .with_bdd_metrics(bdd);
    snapshot
        .write_json(&command.out)
        .map_err(|err| CliError::new(format!("snapshot write failed: {err}")))?;
    let dashboard = DashboardData::from_snapshot(&snapshot, &config.thresholds);
    if let Some(path) = &command.dashboard_out {
        write_json_document(path, &dashboard)
            .map_err(|err| CliError::new(format!("dashboard write failed: {err}")))?;
    }

    emit_stdout(&format!(
        "requests: {} total, {} failed",
        snapshot.summary.total_requests, snapshot.summary.failed_requests
    ))?;
    emit_stdout(&format!(
        "latency: p50 {:.2}ms, p95 {:.2}ms, p99 {:.2}ms",
        snapshot.response_times.p50, snapshot.response_times.p95, snapshot.response_times.p99
    ))?;
    emit_stdout(&format!(
        "error rate: {:.2}%, throughput: {:.2} rps",
        snapshot.summary.error_rate, snapshot.summary.throughput_rps
    ))?;
    if let Some(bdd) = &snapshot.bdd_metrics {
        emit_stdout(&format!(
            "bdd: {}/{} scenarios passed ({:.2}%)",
            bdd.passed, bdd.total_scenarios, bdd.success_rate
        ))?;
    }
    emit_notices(&dashboard)?;
    emit_stdout(&format!("overall: {}", snapshot.overall_status.label()))?;

    if raw.is_empty_sample() {
        emit_stderr("no request samples found in export")?;
        return Ok(ExitCode::FAILURE);
    }
    Ok(exit_for(snapshot.quality_gates.all_passed()))
}

// ============================================================================
// SECTION: Gates Command
// ============================================================================

/// Executes the `gates` command.
fn command_gates(command: &GatesCommand) -> CliResult<ExitCode> {
    let snapshot = MetricsSnapshot::read_json(&command.metrics)
        .map_err(|err| CliError::new(format!("metrics snapshot failed: {err}")))?;
    let config = load_config(command.config.as_deref())?;
    let dashboard = DashboardData::from_snapshot(&snapshot, &config.thresholds);
    if let Some(path) = &command.dashboard {
        write_json_document(path, &dashboard)
            .map_err(|err| CliError::new(format!("dashboard write failed: {err}")))?;
    }

    for (name, passed) in snapshot.quality_gates.named_results() {
        emit_stdout(&format!("gate {name}: {}", verdict_label(passed)))?;
    }
    let rate = gate_success_rate(&snapshot.quality_gates);
    emit_stdout(&format!(
        "gates passed: {}/{} ({rate:.1}%)",
        snapshot.quality_gates.passed_count(),
        snapshot.quality_gates.gate_count()
    ))?;
    emit_notices(&dashboard)?;
    emit_stdout(&format!("overall: {}", snapshot.overall_status.label()))?;

    Ok(exit_for(ci_accepts(&snapshot.quality_gates)))
}

// ============================================================================
// SECTION: Alerts Command
// ============================================================================

/// Executes the `alerts` command.
fn command_alerts(command: &AlertsCommand) -> CliResult<ExitCode> {
    let snapshot = match MetricsSnapshot::read_json(&command.metrics) {
        Ok(snapshot) => snapshot,
        Err(SnapshotError::NotFound(_)) => {
            emit_stdout("no metrics to monitor")?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => return Err(CliError::new(format!("metrics snapshot failed: {err}"))),
    };
    let config = load_config(command.config.as_deref())?;
    let engine = RuleEngine::new(config.to_rules());
    let scope = MetricsScope::from_snapshot(&snapshot);
    let timestamp = now_rfc3339()?;
    let outcome = engine.evaluate(&scope, &timestamp);

    for fault in &outcome.faults {
        emit_stderr(&format!("rule '{}' fault: {}", fault.rule, fault.reason))?;
    }
    if outcome.alerts.is_empty() {
        emit_stdout("no alerts fired")?;
        return Ok(ExitCode::SUCCESS);
    }

    // The audit entry is written before delivery so a transport failure can
    // never lose the record of what fired.
    AlertLog::new(&command.log)
        .append(&timestamp, &outcome.alerts)
        .map_err(|err| CliError::new(format!("alert log append failed: {err}")))?;

    if command.dry_run {
        for alert in &outcome.alerts {
            emit_stdout(&format!(
                "would dispatch '{}' [{}] to {}",
                alert.name,
                alert.severity.label(),
                channel_list(&alert.channels)
            ))?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let dispatcher = build_dispatcher(&config)?;
    let report = dispatcher.dispatch(&outcome.alerts);
    report_dispatch(&report)?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the dispatcher from configured channels and the environment.
///
/// A channel whose transport cannot be constructed (missing URL or
/// credentials) is reported on stderr and left unregistered; its deliveries
/// surface as unregistered outcomes rather than aborting the run.
fn build_dispatcher(config: &LoadgateConfig) -> CliResult<AlertDispatcher> {
    let mut dispatcher = AlertDispatcher::new();

    let webhook_settings = config.channels.webhook.as_ref().map_or_else(
        WebhookSettings::default,
        |webhook| WebhookSettings {
            url: webhook.url.clone(),
            timeout_ms: webhook.timeout_ms,
        },
    );
    register_channel(
        &mut dispatcher,
        ChannelId::Slack,
        WebhookTransport::from_settings(&webhook_settings),
    )?;

    if let Some(email) = &config.channels.email {
        let email_settings = EmailSettings {
            smtp_server: email.smtp_server.clone(),
            port: email.port,
            account: email.account.clone(),
            recipients: email.recipients.clone(),
            timeout_ms: email.timeout_ms,
        };
        register_channel(
            &mut dispatcher,
            ChannelId::Email,
            EmailTransport::from_settings(&email_settings),
        )?;
    }
    Ok(dispatcher)
}

/// Registers a constructed transport, reporting unavailable channels.
fn register_channel<T: Transport + 'static>(
    dispatcher: &mut AlertDispatcher,
    channel: ChannelId,
    transport: Result<T, TransportError>,
) -> CliResult<()> {
    match transport {
        Ok(transport) => {
            dispatcher.register(channel, Arc::new(transport));
            Ok(())
        }
        Err(err) => emit_stderr(&format!("{} channel unavailable: {err}", channel.as_str())),
    }
}

/// Renders the dispatch report to stdout and stderr.
fn report_dispatch(report: &DispatchReport) -> CliResult<()> {
    for outcome in &report.outcomes {
        match &outcome.status {
            DeliveryStatus::Delivered => emit_stdout(&format!(
                "delivered '{}' via {}",
                outcome.alert,
                outcome.channel.as_str()
            ))?,
            DeliveryStatus::Failed(reason) => emit_stderr(&format!(
                "delivery of '{}' via {} failed: {reason}",
                outcome.alert,
                outcome.channel.as_str()
            ))?,
            DeliveryStatus::Unavailable => emit_stderr(&format!(
                "no transport for '{}' channel {}",
                outcome.alert,
                outcome.channel.as_str()
            ))?,
        }
    }
    emit_stdout(&format!(
        "dispatch: {} delivered, {} failed",
        report.delivered_count(),
        report.failed_count()
    ))
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Loads the harness configuration with default resolution rules.
fn load_config(path: Option<&Path>) -> CliResult<LoadgateConfig> {
    LoadgateConfig::load(path).map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Prints active dashboard notices, one line each.
fn emit_notices(dashboard: &DashboardData) -> CliResult<()> {
    for notice in &dashboard.alerts {
        emit_stdout(&format!("notice [{}]: {}", notice.level.label(), notice.message))?;
    }
    Ok(())
}

/// Returns the current UTC time formatted as RFC 3339.
fn now_rfc3339() -> CliResult<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| CliError::new(format!("timestamp formatting failed: {err}")))
}

/// Returns the gate success rate in percent.
fn gate_success_rate(gates: &QualityGates) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Gate counts are single digits; f64 is exact."
    )]
    let rate = (gates.passed_count() as f64 / gates.gate_count() as f64) * 100.0;
    rate
}

/// Returns whether the CI contract accepts this gate outcome.
fn ci_accepts(gates: &QualityGates) -> bool {
    gates.all_passed() && gate_success_rate(gates) >= CI_MIN_GATE_SUCCESS_PCT
}

/// Renders a pass/fail verdict label.
const fn verdict_label(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

/// Maps a success flag to the process exit code.
fn exit_for(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Renders a channel list for display.
fn channel_list(channels: &[ChannelId]) -> String {
    let names: Vec<&str> = channels.iter().map(ChannelId::as_str).collect();
    names.join(", ")
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes a line to stdout, wrapping I/O failures as CLI errors.
fn emit_stdout(message: &str) -> CliResult<()> {
    write_stdout_line(message)
        .map_err(|err| CliError::new(format!("stdout write failed: {err}")))
}

/// Writes a line to stderr, wrapping I/O failures as CLI errors.
fn emit_stderr(message: &str) -> CliResult<()> {
    write_stderr_line(message)
        .map_err(|err| CliError::new(format!("stderr write failed: {err}")))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
