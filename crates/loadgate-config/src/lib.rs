// crates/loadgate-config/src/lib.rs
// ============================================================================
// Module: Loadgate Config Library
// Description: TOML configuration loading and validation.
// Purpose: Resolve, parse, and validate the harness configuration file.
// Dependencies: loadgate-core, loadgate-rules, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is one TOML file holding gate thresholds, alert rules, and
//! channel settings. Loading is strict: oversized or non-UTF-8 files,
//! unparsable TOML, and semantically invalid content (duplicate rule names,
//! unparsable rule conditions, out-of-range timeouts) are all fatal. An
//! absent file is fatal only when its path was given explicitly; the
//! environment or default resolution falls back to built-in defaults so the
//! analyze and gate commands work without any file.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ChannelsConfig;
pub use config::ConfigError;
pub use config::EmailChannelConfig;
pub use config::LoadgateConfig;
pub use config::RuleConfig;
pub use config::WebhookChannelConfig;
