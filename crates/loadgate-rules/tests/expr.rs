// crates/loadgate-rules/tests/expr.rs
// ============================================================================
// Module: Expression Language Tests
// Description: Grammar coverage and fault behavior of the interpreter.
// Purpose: Pin the restricted language rules against hand-written inputs.
// Dependencies: loadgate-rules
// ============================================================================

//! Tests for the restricted condition language.

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

use loadgate_rules::Expr;
use loadgate_rules::ExprError;
use loadgate_rules::MAX_EXPR_LENGTH;
use loadgate_rules::MetricsScope;
use loadgate_rules::Value;

/// Scope fixture used across the expression tests.
fn scope() -> MetricsScope {
    MetricsScope {
        response_time_p95: 1800.0,
        error_rate: 6.5,
        throughput: 8.0,
        bdd_success_rate: 92.0,
    }
}

/// Parses and evaluates a condition against the fixture scope.
fn eval(text: &str) -> Result<Value, ExprError> {
    Expr::parse(text)?.evaluate(&scope())
}

#[test]
fn comparisons_over_each_variable() {
    assert_eq!(eval("response_time_p95 > 1500").unwrap(), Value::Bool(true));
    assert_eq!(eval("error_rate <= 5").unwrap(), Value::Bool(false));
    assert_eq!(eval("throughput < 10").unwrap(), Value::Bool(true));
    assert_eq!(eval("bdd_success_rate >= 95").unwrap(), Value::Bool(false));
}

#[test]
fn keyword_and_symbol_logical_forms_agree() {
    let keyword = eval("error_rate > 5 and throughput < 10").unwrap();
    let symbol = eval("error_rate > 5 && throughput < 10").unwrap();
    assert_eq!(keyword, symbol);
    assert_eq!(keyword, Value::Bool(true));

    let keyword = eval("error_rate > 100 or throughput < 10").unwrap();
    let symbol = eval("error_rate > 100 || throughput < 10").unwrap();
    assert_eq!(keyword, symbol);
    assert_eq!(keyword, Value::Bool(true));

    assert_eq!(eval("not (error_rate > 5)").unwrap(), Value::Bool(false));
    assert_eq!(eval("!(error_rate > 5)").unwrap(), Value::Bool(false));
}

#[test]
fn arithmetic_respects_precedence() {
    assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Num(7.0));
    assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Num(9.0));
    assert_eq!(eval("-throughput + 10 == 2").unwrap(), Value::Bool(true));
    assert_eq!(eval("error_rate * 2 > 12").unwrap(), Value::Bool(true));
}

#[test]
fn and_binds_tighter_than_or() {
    // false or (true and true) — a left-to-right reading would be false.
    assert_eq!(eval("1 > 2 or 3 > 2 and 4 > 3").unwrap(), Value::Bool(true));
}

#[test]
fn division_by_zero_faults() {
    assert_eq!(eval("error_rate / 0 > 1").unwrap_err(), ExprError::DivisionByZero);
}

#[test]
fn unknown_identifier_faults() {
    let error = eval("cpu_usage > 80").unwrap_err();
    assert!(matches!(error, ExprError::UnknownIdentifier { name } if name == "cpu_usage"));
}

#[test]
fn type_mismatches_fault() {
    assert!(matches!(eval("(1 > 2) + 1"), Err(ExprError::TypeMismatch { .. })));
    assert!(matches!(eval("error_rate and throughput"), Err(ExprError::TypeMismatch { .. })));
    assert!(matches!(eval("not error_rate"), Err(ExprError::TypeMismatch { .. })));
}

#[test]
fn chained_comparisons_do_not_parse() {
    assert!(matches!(eval("1 < 2 < 3"), Err(ExprError::Syntax(_))));
}

#[test]
fn malformed_conditions_fault() {
    assert!(eval("").is_err());
    assert!(eval("error_rate >").is_err());
    assert!(eval("(error_rate > 5").is_err());
    assert!(eval("error_rate > 5)").is_err());
    assert!(eval("1.2.3 > 0").is_err());
    assert!(eval("error_rate @ 5").is_err());
}

#[test]
fn oversized_condition_faults() {
    let text = format!("error_rate > {}", "1".repeat(MAX_EXPR_LENGTH));
    assert!(matches!(Expr::parse(&text), Err(ExprError::TooLong { .. })));
}

#[test]
fn deep_nesting_faults_instead_of_recursing() {
    let mut text = String::new();
    for _ in 0..40 {
        text.push('(');
    }
    text.push('1');
    for _ in 0..40 {
        text.push(')');
    }
    assert!(matches!(Expr::parse(&text), Err(ExprError::TooDeep { .. })));
}
