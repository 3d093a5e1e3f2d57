// crates/loadgate-config/src/config.rs
// ============================================================================
// Module: Loadgate Configuration
// Description: Configuration loading and validation for the harness.
// Purpose: Provide strict config parsing with hard size and content limits.
// Dependencies: loadgate-core, loadgate-rules, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits. All
//! sections are optional and default to the built-in thresholds, no rules,
//! and no channels. Every alert rule condition is parsed at load time so a
//! broken expression surfaces as a config error rather than a silent
//! per-run rule fault.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use loadgate_core::GateThresholds;
use loadgate_rules::AlertRule;
use loadgate_rules::ChannelId;
use loadgate_rules::Expr;
use loadgate_rules::Severity;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "loadgate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LOADGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum number of alert rules.
pub(crate) const MAX_ALERT_RULES: usize = 128;
/// Maximum number of email recipients.
pub(crate) const MAX_EMAIL_RECIPIENTS: usize = 64;
/// Minimum allowed delivery timeout in milliseconds.
pub(crate) const MIN_DELIVERY_TIMEOUT_MS: u64 = 100;
/// Maximum allowed delivery timeout in milliseconds.
pub(crate) const MAX_DELIVERY_TIMEOUT_MS: u64 = 60_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Harness configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadgateConfig {
    /// Quality gate thresholds.
    pub thresholds: GateThresholds,
    /// Alert rule definitions.
    pub rules: Vec<RuleConfig>,
    /// Alert channel settings.
    pub channels: ChannelsConfig,
}

/// One alert rule as written in configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Unique rule name.
    pub name: String,
    /// Severity assigned to fired alerts.
    pub severity: Severity,
    /// Boolean condition over the metric variables.
    pub condition: String,
    /// Message template with `{variable}` placeholders.
    pub message: String,
    /// Channels the rule's alerts are addressed to.
    pub channels: Vec<ChannelId>,
}

impl RuleConfig {
    /// Converts the config entry into an engine rule.
    #[must_use]
    pub fn to_rule(&self) -> AlertRule {
        AlertRule {
            name: self.name.clone(),
            severity: self.severity,
            condition: self.condition.clone(),
            message: self.message.clone(),
            channels: self.channels.clone(),
        }
    }
}

/// Alert channel settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Webhook channel settings; absent leaves the channel unregistered.
    pub webhook: Option<WebhookChannelConfig>,
    /// Email channel settings; absent leaves the channel unregistered.
    pub email: Option<EmailChannelConfig>,
}

/// Webhook channel configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookChannelConfig {
    /// Webhook URL; absent falls back to the environment at dispatch time.
    pub url: Option<String>,
    /// Delivery timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Email channel configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailChannelConfig {
    /// SMTP relay host.
    pub smtp_server: String,
    /// SMTP submission port.
    pub port: Option<u16>,
    /// Sending account; absent falls back to the environment.
    pub account: Option<String>,
    /// Recipient addresses.
    pub recipients: Vec<String>,
    /// Delivery timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl LoadgateConfig {
    /// Loads configuration from disk using the default resolution rules:
    /// explicit path, then [`CONFIG_ENV_VAR`], then [`DEFAULT_CONFIG_NAME`].
    ///
    /// An absent file is an error only for an explicit path; the environment
    /// and default resolutions fall back to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let resolved = resolve_path(path);
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        Self::load_file(&resolved)
    }

    /// Loads configuration from an exact file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rules.len() > MAX_ALERT_RULES {
            return Err(ConfigError::Invalid(format!(
                "too many alert rules (max {MAX_ALERT_RULES})"
            )));
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            validate_rule(rule)?;
            if seen.contains(&rule.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate alert rule name '{}'",
                    rule.name
                )));
            }
            seen.push(rule.name.as_str());
        }
        if let Some(webhook) = &self.channels.webhook {
            validate_timeout("channels.webhook", webhook.timeout_ms)?;
        }
        if let Some(email) = &self.channels.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Converts every configured rule into an engine rule, in file order.
    #[must_use]
    pub fn to_rules(&self) -> Vec<AlertRule> {
        self.rules.iter().map(RuleConfig::to_rule).collect()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors emitted while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error at '{path}': {detail}")]
    Io {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error text.
        detail: String,
    },
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR)
        && !env_path.is_empty()
    {
        return PathBuf::from(env_path);
    }
    PathBuf::from(DEFAULT_CONFIG_NAME)
}

/// Validates one rule entry, including its condition expression.
fn validate_rule(rule: &RuleConfig) -> Result<(), ConfigError> {
    if rule.name.trim().is_empty() {
        return Err(ConfigError::Invalid("alert rule name must not be empty".to_string()));
    }
    if rule.message.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "alert rule '{}' message must not be empty",
            rule.name
        )));
    }
    if rule.channels.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "alert rule '{}' must name at least one channel",
            rule.name
        )));
    }
    Expr::parse(&rule.condition).map_err(|err| {
        ConfigError::Invalid(format!("alert rule '{}' condition: {err}", rule.name))
    })?;
    Ok(())
}

/// Validates a delivery timeout against the allowed range.
fn validate_timeout(section: &str, timeout_ms: Option<u64>) -> Result<(), ConfigError> {
    if let Some(timeout) = timeout_ms
        && !(MIN_DELIVERY_TIMEOUT_MS..=MAX_DELIVERY_TIMEOUT_MS).contains(&timeout)
    {
        return Err(ConfigError::Invalid(format!(
            "{section}.timeout_ms must be between {MIN_DELIVERY_TIMEOUT_MS} and \
             {MAX_DELIVERY_TIMEOUT_MS}"
        )));
    }
    Ok(())
}

/// Validates the email channel section.
fn validate_email(email: &EmailChannelConfig) -> Result<(), ConfigError> {
    if email.smtp_server.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "channels.email.smtp_server must not be empty".to_string(),
        ));
    }
    if email.recipients.is_empty() {
        return Err(ConfigError::Invalid(
            "channels.email.recipients must not be empty".to_string(),
        ));
    }
    if email.recipients.len() > MAX_EMAIL_RECIPIENTS {
        return Err(ConfigError::Invalid(format!(
            "too many email recipients (max {MAX_EMAIL_RECIPIENTS})"
        )));
    }
    if email.recipients.iter().any(|addr| addr.trim().is_empty()) {
        return Err(ConfigError::Invalid(
            "channels.email.recipients must not contain empty addresses".to_string(),
        ));
    }
    validate_timeout("channels.email", email.timeout_ms)
}
