// crates/loadgate-rules/src/expr/mod.rs
// ============================================================================
// Module: Restricted Expression Language
// Description: AST, parsing, and evaluation for rule conditions.
// Purpose: Safely evaluate user-authored boolean expressions.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Rule conditions are expressions over exactly four named variables:
//! `response_time_p95`, `error_rate`, `throughput`, and `bdd_success_rate`.
//! The grammar covers numeric literals, parentheses, unary minus, arithmetic
//! (`+ - * /`), comparisons (`< <= > >= == !=`), and logical operators in
//! keyword (`and`, `or`, `not`) and symbol (`&&`, `||`, `!`) form. Input is
//! tokenized ([`lexer`]), parsed into an [`Expr`] tree ([`parser`]), and
//! evaluated with typed semantics ([`eval`]).
//! Invariants:
//! - No identifier outside the fixed variable set parses.
//! - Expression length and nesting depth are hard-limited.
//! - Every fault is an [`ExprError`] value; evaluation never panics.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod eval;
mod lexer;
mod parser;

pub use eval::Bindings;
pub use eval::Value;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted condition text length, in bytes.
pub const MAX_EXPR_LENGTH: usize = 512;

/// Maximum accepted recursion depth while parsing. Each grammar level costs
/// one unit, so the deepest accepted parenthesization is a fraction of this.
pub const MAX_EXPR_DEPTH: usize = 64;

// ============================================================================
// SECTION: Expression Errors
// ============================================================================

/// Faults raised while parsing or evaluating a condition.
///
/// # Invariants
/// - Variants are stable; the rule engine logs them and treats the rule as
///   non-matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// Condition text exceeds [`MAX_EXPR_LENGTH`].
    #[error("condition exceeds length limit ({limit} bytes)")]
    TooLong {
        /// Maximum accepted length.
        limit: usize,
    },
    /// Expression nesting exceeds [`MAX_EXPR_DEPTH`].
    #[error("condition exceeds depth limit ({limit})")]
    TooDeep {
        /// Maximum accepted depth.
        limit: usize,
    },
    /// A character outside the grammar was found.
    #[error("unexpected character {found:?} at byte {position}")]
    UnexpectedCharacter {
        /// Offending character.
        found: char,
        /// Byte offset in the condition text.
        position: usize,
    },
    /// A numeric literal could not be parsed.
    #[error("malformed number {text:?}")]
    MalformedNumber {
        /// Offending literal text.
        text: String,
    },
    /// An identifier outside the fixed variable set was referenced.
    #[error("unknown identifier {name:?}")]
    UnknownIdentifier {
        /// Offending identifier.
        name: String,
    },
    /// The token stream ended or continued unexpectedly.
    #[error("malformed condition: {0}")]
    Syntax(String),
    /// An operator was applied to operands of the wrong type.
    #[error("type mismatch: {operator} is not defined for {operand}")]
    TypeMismatch {
        /// Operator that faulted.
        operator: &'static str,
        /// Description of the offending operand type(s).
        operand: &'static str,
    },
    /// A division had a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
}

// ============================================================================
// SECTION: Variables
// ============================================================================

/// The fixed variable set rule conditions may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// 95th-percentile response time, milliseconds.
    ResponseTimeP95,
    /// Error rate, percent.
    ErrorRate,
    /// Throughput, requests per second.
    Throughput,
    /// BDD suite success rate, percent (100 when the suite did not run).
    BddSuccessRate,
}

impl Variable {
    /// Returns the identifier used in condition text and message templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResponseTimeP95 => "response_time_p95",
            Self::ErrorRate => "error_rate",
            Self::Throughput => "throughput",
            Self::BddSuccessRate => "bdd_success_rate",
        }
    }

    /// Resolves an identifier to a variable.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|variable| variable.as_str() == name)
    }

    /// Every variable, in documentation order.
    pub const ALL: [Self; 4] =
        [Self::ResponseTimeP95, Self::ErrorRate, Self::Throughput, Self::BddSuccessRate];
}

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Unary operators of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Numeric negation.
    Negate,
    /// Boolean negation.
    Not,
}

/// Binary operators of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Numeric addition.
    Add,
    /// Numeric subtraction.
    Subtract,
    /// Numeric multiplication.
    Multiply,
    /// Numeric division; zero divisors fault.
    Divide,
    /// Strictly-less comparison.
    Less,
    /// Less-or-equal comparison.
    LessEqual,
    /// Strictly-greater comparison.
    Greater,
    /// Greater-or-equal comparison.
    GreaterEqual,
    /// Equality; defined on numbers and booleans.
    Equal,
    /// Inequality; defined on numbers and booleans.
    NotEqual,
    /// Boolean conjunction.
    And,
    /// Boolean disjunction.
    Or,
}

// ============================================================================
// SECTION: Expression Tree
// ============================================================================

/// Parsed condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Reference to one of the four variables.
    Var(Variable),
    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand subtree.
        operand: Box<Expr>,
    },
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left subtree.
        lhs: Box<Expr>,
        /// Right subtree.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Parses condition text into an expression tree.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError`] for text outside the restricted grammar or
    /// beyond the length/depth limits.
    pub fn parse(text: &str) -> Result<Self, ExprError> {
        if text.len() > MAX_EXPR_LENGTH {
            return Err(ExprError::TooLong {
                limit: MAX_EXPR_LENGTH,
            });
        }
        let tokens = lexer::tokenize(text)?;
        parser::parse_tokens(&tokens)
    }

    /// Evaluates the expression against variable bindings.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError`] for type mismatches and zero divisors.
    pub fn evaluate<B: Bindings>(&self, bindings: &B) -> Result<Value, ExprError> {
        eval::evaluate(self, bindings)
    }
}
