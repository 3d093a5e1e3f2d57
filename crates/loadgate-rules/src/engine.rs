// crates/loadgate-rules/src/engine.rs
// ============================================================================
// Module: Alert Rule Engine
// Description: Rule evaluation over a metrics scope with fault isolation.
// Purpose: Produce alert records for matching rules, never halting on faults.
// Dependencies: loadgate-core, serde, crate::expr, crate::rule
// ============================================================================

//! ## Overview
//! The engine extracts a [`MetricsScope`] — the four named scalars rules may
//! reference — from a metrics snapshot, then evaluates every configured rule
//! against it. Matching is independent per rule: multiple rules may fire for
//! one snapshot and there is no deduplication or suppression window. A rule
//! whose condition faults (or reduces to a non-boolean) contributes a
//! [`RuleFault`] instead of an alert and evaluation continues with the next
//! rule.

// ============================================================================
// SECTION: Imports
// ============================================================================

use loadgate_core::MetricsSnapshot;
use serde::Deserialize;
use serde::Serialize;

use crate::expr::Bindings;
use crate::expr::Expr;
use crate::expr::Value;
use crate::expr::Variable;
use crate::rule::AlertRecord;
use crate::rule::AlertRule;

// ============================================================================
// SECTION: Metrics Scope
// ============================================================================

/// Default BDD success rate when the suite did not run.
const DEFAULT_BDD_SUCCESS_RATE: f64 = 100.0;

/// The four named scalars rule conditions are evaluated against.
///
/// # Invariants
/// - Every field is always bound; absence of BDD metrics defaults
///   `bdd_success_rate` to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsScope {
    /// 95th-percentile response time, milliseconds.
    pub response_time_p95: f64,
    /// Error rate, percent.
    pub error_rate: f64,
    /// Throughput, requests per second.
    pub throughput: f64,
    /// BDD suite success rate, percent.
    pub bdd_success_rate: f64,
}

impl MetricsScope {
    /// Extracts the scope from a metrics snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        Self {
            response_time_p95: snapshot.response_times.p95,
            error_rate: snapshot.summary.error_rate,
            throughput: snapshot.summary.throughput_rps,
            bdd_success_rate: snapshot
                .bdd_metrics
                .as_ref()
                .map_or(DEFAULT_BDD_SUCCESS_RATE, |metrics| metrics.success_rate),
        }
    }

    /// Renders a message template, substituting `{variable}` placeholders
    /// with two-decimal values. Unknown placeholders are left verbatim.
    #[must_use]
    pub fn render_template(&self, template: &str) -> String {
        let mut rendered = template.to_string();
        for variable in Variable::ALL {
            let placeholder = format!("{{{}}}", variable.as_str());
            if rendered.contains(&placeholder) {
                let value = format!("{:.2}", self.value(variable));
                rendered = rendered.replace(&placeholder, &value);
            }
        }
        rendered
    }
}

impl Bindings for MetricsScope {
    fn value(&self, variable: Variable) -> f64 {
        match variable {
            Variable::ResponseTimeP95 => self.response_time_p95,
            Variable::ErrorRate => self.error_rate,
            Variable::Throughput => self.throughput,
            Variable::BddSuccessRate => self.bdd_success_rate,
        }
    }
}

// ============================================================================
// SECTION: Evaluation Outcome
// ============================================================================

/// A rule that could not be evaluated.
///
/// Faults are reported for logging and otherwise treated as non-matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFault {
    /// Name of the faulting rule.
    pub rule: String,
    /// Human-readable fault description.
    pub reason: String,
}

/// Result of evaluating the full rule set once.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    /// Alerts for rules whose conditions held.
    pub alerts: Vec<AlertRecord>,
    /// Faulting rules, in rule order.
    pub faults: Vec<RuleFault>,
}

// ============================================================================
// SECTION: Rule Engine
// ============================================================================

/// Evaluates a configured rule set against metrics scopes.
///
/// The rule set is fixed at construction; evaluation is pure and reusable
/// across runs.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    /// Configured rules, in evaluation order.
    rules: Vec<AlertRule>,
}

impl RuleEngine {
    /// Creates an engine over a configured rule set.
    #[must_use]
    pub const fn new(rules: Vec<AlertRule>) -> Self {
        Self {
            rules,
        }
    }

    /// Returns the configured rules.
    #[must_use]
    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Evaluates every rule against the scope.
    ///
    /// The caller supplies the fire timestamp; the engine never reads
    /// wall-clock time. Faulting rules are reported, not propagated.
    #[must_use]
    pub fn evaluate(&self, scope: &MetricsScope, timestamp: &str) -> RuleOutcome {
        let mut alerts = Vec::new();
        let mut faults = Vec::new();
        for rule in &self.rules {
            let matched = Expr::parse(&rule.condition)
                .and_then(|expr| expr.evaluate(scope))
                .and_then(Value::as_bool);
            match matched {
                Ok(true) => alerts.push(AlertRecord {
                    name: rule.name.clone(),
                    severity: rule.severity,
                    message: scope.render_template(&rule.message),
                    timestamp: timestamp.to_string(),
                    channels: rule.channels.clone(),
                    metrics: *scope,
                }),
                Ok(false) => {}
                Err(error) => faults.push(RuleFault {
                    rule: rule.name.clone(),
                    reason: error.to_string(),
                }),
            }
        }
        RuleOutcome {
            alerts,
            faults,
        }
    }
}
