// crates/loadgate-rules/src/lib.rs
// ============================================================================
// Module: Loadgate Rules Library
// Description: Alert rules and the restricted expression language.
// Purpose: Evaluate user-authored boolean conditions over a metrics scope.
// Dependencies: loadgate-core, serde, thiserror
// ============================================================================

//! ## Overview
//! Alert rules are declarative: a name, a severity, a boolean condition over
//! four named metric scalars, a message template, and a channel list. The
//! condition text is parsed by a restricted interpreter — an AST limited to
//! arithmetic, comparison, and logical operators over a fixed variable set —
//! never handed to a general-purpose evaluator. Rule faults (unknown names,
//! division by zero, non-boolean results) make that rule non-matching and
//! are reported alongside the matches; they never halt evaluation of the
//! remaining rules.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod engine;
pub mod expr;
pub mod rule;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::MetricsScope;
pub use engine::RuleEngine;
pub use engine::RuleFault;
pub use engine::RuleOutcome;
pub use expr::Expr;
pub use expr::ExprError;
pub use expr::MAX_EXPR_DEPTH;
pub use expr::MAX_EXPR_LENGTH;
pub use expr::Value;
pub use expr::Variable;
pub use rule::AlertRecord;
pub use rule::AlertRule;
pub use rule::ChannelId;
pub use rule::Severity;
