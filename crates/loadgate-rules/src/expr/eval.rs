// crates/loadgate-rules/src/expr/eval.rs
// ============================================================================
// Module: Condition Evaluator
// Description: Typed evaluation of parsed condition trees.
// Purpose: Reduce an expression to a value, faulting on type errors.
// Dependencies: crate::expr
// ============================================================================

//! ## Overview
//! Evaluation is typed: arithmetic operators require numbers, logical
//! operators require booleans, and comparisons of numbers yield booleans.
//! Equality is additionally defined over boolean pairs. There is no
//! truthiness coercion; a rule condition that reduces to a number is a
//! fault, not a match. Division by zero faults instead of producing an
//! infinity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::BinaryOp;
use super::Expr;
use super::ExprError;
use super::UnaryOp;
use super::Variable;

// ============================================================================
// SECTION: Bindings
// ============================================================================

/// Supplies a value for each variable of the fixed set.
///
/// Every variable is always bound; the unknown-identifier fault is raised at
/// parse time instead.
pub trait Bindings {
    /// Returns the bound value of a variable.
    fn value(&self, variable: Variable) -> f64;
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// Result of evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// Numeric result.
    Num(f64),
    /// Boolean result.
    Bool(bool),
}

impl Value {
    /// Returns the boolean payload, faulting for numeric values.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::TypeMismatch`] when the value is numeric.
    pub const fn as_bool(self) -> Result<bool, ExprError> {
        match self {
            Self::Bool(value) => Ok(value),
            Self::Num(_) => Err(ExprError::TypeMismatch {
                operator: "condition",
                operand: "a numeric result",
            }),
        }
    }

    /// Returns the numeric payload, faulting for boolean values.
    const fn as_num(self, operator: &'static str) -> Result<f64, ExprError> {
        match self {
            Self::Num(value) => Ok(value),
            Self::Bool(_) => Err(ExprError::TypeMismatch {
                operator,
                operand: "a boolean operand",
            }),
        }
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates an expression tree against bindings.
///
/// # Errors
///
/// Returns [`ExprError`] for type mismatches and zero divisors; never
/// panics.
pub(super) fn evaluate<B: Bindings>(expr: &Expr, bindings: &B) -> Result<Value, ExprError> {
    match expr {
        Expr::Number(value) => Ok(Value::Num(*value)),
        Expr::Var(variable) => Ok(Value::Num(bindings.value(*variable))),
        Expr::Unary {
            op,
            operand,
        } => {
            let value = evaluate(operand, bindings)?;
            match op {
                UnaryOp::Negate => Ok(Value::Num(-value.as_num("unary minus")?)),
                UnaryOp::Not => match value {
                    Value::Bool(inner) => Ok(Value::Bool(!inner)),
                    Value::Num(_) => Err(ExprError::TypeMismatch {
                        operator: "not",
                        operand: "a numeric operand",
                    }),
                },
            }
        }
        Expr::Binary {
            op,
            lhs,
            rhs,
        } => {
            let left = evaluate(lhs, bindings)?;
            let right = evaluate(rhs, bindings)?;
            apply_binary(*op, left, right)
        }
    }
}

/// Applies a binary operator to evaluated operands.
#[allow(
    clippy::float_cmp,
    reason = "The zero-divisor check is an exact comparison by contract."
)]
fn apply_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, ExprError> {
    match op {
        BinaryOp::Add => numeric(op, left, right, |a, b| Value::Num(a + b)),
        BinaryOp::Subtract => numeric(op, left, right, |a, b| Value::Num(a - b)),
        BinaryOp::Multiply => numeric(op, left, right, |a, b| Value::Num(a * b)),
        BinaryOp::Divide => {
            let divisor = right.as_num(symbol(op))?;
            if divisor == 0.0 {
                return Err(ExprError::DivisionByZero);
            }
            Ok(Value::Num(left.as_num(symbol(op))? / divisor))
        }
        BinaryOp::Less => numeric(op, left, right, |a, b| Value::Bool(a < b)),
        BinaryOp::LessEqual => numeric(op, left, right, |a, b| Value::Bool(a <= b)),
        BinaryOp::Greater => numeric(op, left, right, |a, b| Value::Bool(a > b)),
        BinaryOp::GreaterEqual => numeric(op, left, right, |a, b| Value::Bool(a >= b)),
        BinaryOp::Equal => equality(left, right, false),
        BinaryOp::NotEqual => equality(left, right, true),
        BinaryOp::And => boolean(op, left, right, |a, b| a && b),
        BinaryOp::Or => boolean(op, left, right, |a, b| a || b),
    }
}

/// Applies a numeric operator, faulting on boolean operands.
fn numeric(
    op: BinaryOp,
    left: Value,
    right: Value,
    apply: impl Fn(f64, f64) -> Value,
) -> Result<Value, ExprError> {
    Ok(apply(left.as_num(symbol(op))?, right.as_num(symbol(op))?))
}

/// Applies a boolean operator, faulting on numeric operands.
fn boolean(
    op: BinaryOp,
    left: Value,
    right: Value,
    apply: impl Fn(bool, bool) -> bool,
) -> Result<Value, ExprError> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(apply(a, b))),
        _ => Err(ExprError::TypeMismatch {
            operator: symbol(op),
            operand: "a numeric operand",
        }),
    }
}

/// Applies `==`/`!=` over same-typed operands.
#[allow(
    clippy::float_cmp,
    reason = "Rule equality over metric scalars is an exact comparison by contract."
)]
fn equality(left: Value, right: Value, negate: bool) -> Result<Value, ExprError> {
    let equal = match (left, right) {
        (Value::Num(a), Value::Num(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => {
            return Err(ExprError::TypeMismatch {
                operator: if negate { "!=" } else { "==" },
                operand: "mixed boolean and numeric operands",
            });
        }
    };
    Ok(Value::Bool(equal != negate))
}

/// Returns the display symbol of a binary operator for fault messages.
const fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Subtract => "-",
        BinaryOp::Multiply => "*",
        BinaryOp::Divide => "/",
        BinaryOp::Less => "<",
        BinaryOp::LessEqual => "<=",
        BinaryOp::Greater => ">",
        BinaryOp::GreaterEqual => ">=",
        BinaryOp::Equal => "==",
        BinaryOp::NotEqual => "!=",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
    }
}
