// crates/loadgate-rules/src/expr/parser.rs
// ============================================================================
// Module: Condition Parser
// Description: Recursive-descent parser for the restricted grammar.
// Purpose: Build the expression tree with bounded nesting depth.
// Dependencies: crate::expr::lexer
// ============================================================================

//! ## Overview
//! Precedence, loosest to tightest: `or`, `and`, `not`, comparison,
//! additive, multiplicative, unary minus. Comparisons are non-associative
//! (`a < b < c` does not parse). Nesting depth is capped at
//! [`super::MAX_EXPR_DEPTH`]; deeper input faults instead of recursing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::BinaryOp;
use super::Expr;
use super::ExprError;
use super::MAX_EXPR_DEPTH;
use super::UnaryOp;
use super::lexer::Token;

// ============================================================================
// SECTION: Parser State
// ============================================================================

/// Cursor over the token stream.
struct Parser<'a> {
    /// Tokens being parsed.
    tokens: &'a [Token],
    /// Next token index.
    position: usize,
}

impl<'a> Parser<'a> {
    /// Returns the next token without consuming it.
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// Consumes and returns the next token.
    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Enters one nesting level, faulting past the depth limit.
    fn descend(depth: usize) -> Result<usize, ExprError> {
        if depth >= MAX_EXPR_DEPTH {
            return Err(ExprError::TooDeep {
                limit: MAX_EXPR_DEPTH,
            });
        }
        Ok(depth + 1)
    }

    /// Parses an `or` chain.
    fn or_expr(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let depth = Self::descend(depth)?;
        let mut expr = self.and_expr(depth)?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let rhs = self.and_expr(depth)?;
            expr = binary(BinaryOp::Or, expr, rhs);
        }
        Ok(expr)
    }

    /// Parses an `and` chain.
    fn and_expr(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let depth = Self::descend(depth)?;
        let mut expr = self.not_expr(depth)?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let rhs = self.not_expr(depth)?;
            expr = binary(BinaryOp::And, expr, rhs);
        }
        Ok(expr)
    }

    /// Parses a `not` prefix.
    fn not_expr(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let depth = Self::descend(depth)?;
        if self.peek() == Some(&Token::Not) {
            self.advance();
            let operand = self.not_expr(depth)?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.comparison(depth)
    }

    /// Parses an optional single comparison.
    fn comparison(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let depth = Self::descend(depth)?;
        let lhs = self.additive(depth)?;
        let op = match self.peek() {
            Some(Token::Less) => BinaryOp::Less,
            Some(Token::LessEqual) => BinaryOp::LessEqual,
            Some(Token::Greater) => BinaryOp::Greater,
            Some(Token::GreaterEqual) => BinaryOp::GreaterEqual,
            Some(Token::EqualEqual) => BinaryOp::Equal,
            Some(Token::BangEqual) => BinaryOp::NotEqual,
            _ => return Ok(lhs),
        };
        self.advance();
        let rhs = self.additive(depth)?;
        Ok(binary(op, lhs, rhs))
    }

    /// Parses an additive chain.
    fn additive(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let depth = Self::descend(depth)?;
        let mut expr = self.multiplicative(depth)?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => return Ok(expr),
            };
            self.advance();
            let rhs = self.multiplicative(depth)?;
            expr = binary(op, expr, rhs);
        }
    }

    /// Parses a multiplicative chain.
    fn multiplicative(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let depth = Self::descend(depth)?;
        let mut expr = self.unary(depth)?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Multiply,
                Some(Token::Slash) => BinaryOp::Divide,
                _ => return Ok(expr),
            };
            self.advance();
            let rhs = self.unary(depth)?;
            expr = binary(op, expr, rhs);
        }
    }

    /// Parses a unary-minus prefix.
    fn unary(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let depth = Self::descend(depth)?;
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            let operand = self.unary(depth)?;
            return Ok(Expr::Unary {
                op: UnaryOp::Negate,
                operand: Box::new(operand),
            });
        }
        self.atom(depth)
    }

    /// Parses a literal, variable, or parenthesized expression.
    fn atom(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let depth = Self::descend(depth)?;
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Number(*value)),
            Some(Token::Var(variable)) => Ok(Expr::Var(*variable)),
            Some(Token::LeftParen) => {
                let expr = self.or_expr(depth)?;
                if self.advance() == Some(&Token::RightParen) {
                    Ok(expr)
                } else {
                    Err(ExprError::Syntax("expected closing parenthesis".to_string()))
                }
            }
            Some(_) => Err(ExprError::Syntax("unexpected token".to_string())),
            None => Err(ExprError::Syntax("unexpected end of condition".to_string())),
        }
    }
}

/// Builds a binary expression node.
fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Parses a full token stream into one expression.
///
/// # Errors
///
/// Returns [`ExprError::Syntax`] for empty input and trailing tokens, and
/// propagates structural faults from the grammar rules.
pub(super) fn parse_tokens(tokens: &[Token]) -> Result<Expr, ExprError> {
    if tokens.is_empty() {
        return Err(ExprError::Syntax("empty condition".to_string()));
    }
    let mut parser = Parser {
        tokens,
        position: 0,
    };
    let expr = parser.or_expr(0)?;
    if parser.position != tokens.len() {
        return Err(ExprError::Syntax("trailing tokens after condition".to_string()));
    }
    Ok(expr)
}
