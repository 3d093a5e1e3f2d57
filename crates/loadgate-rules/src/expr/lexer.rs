// crates/loadgate-rules/src/expr/lexer.rs
// ============================================================================
// Module: Condition Lexer
// Description: Tokenizer for the restricted condition grammar.
// Purpose: Turn condition text into a bounded token stream.
// Dependencies: crate::expr
// ============================================================================

//! ## Overview
//! The lexer recognizes numbers, identifiers, parentheses, arithmetic and
//! comparison operators, and the logical operators in both keyword and
//! symbol form. Anything else is an [`ExprError::UnexpectedCharacter`].
//! Identifiers are resolved against the fixed variable set immediately, so
//! unknown names fault before parsing begins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::ExprError;
use super::Variable;

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// One lexical token of a condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Token {
    /// Numeric literal.
    Number(f64),
    /// Variable reference.
    Var(Variable),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `and` / `&&`
    And,
    /// `or` / `||`
    Or,
    /// `not` / `!`
    Not,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

// ============================================================================
// SECTION: Tokenizer
// ============================================================================

/// Tokenizes condition text.
///
/// # Errors
///
/// Returns [`ExprError`] for characters outside the grammar, malformed
/// numbers, and identifiers outside the fixed variable set.
pub(super) fn tokenize(text: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        match byte {
            b' ' | b'\t' | b'\r' | b'\n' => index += 1,
            b'(' => {
                tokens.push(Token::LeftParen);
                index += 1;
            }
            b')' => {
                tokens.push(Token::RightParen);
                index += 1;
            }
            b'+' => {
                tokens.push(Token::Plus);
                index += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                index += 1;
            }
            b'*' => {
                tokens.push(Token::Star);
                index += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                index += 1;
            }
            b'<' => {
                if bytes.get(index + 1) == Some(&b'=') {
                    tokens.push(Token::LessEqual);
                    index += 2;
                } else {
                    tokens.push(Token::Less);
                    index += 1;
                }
            }
            b'>' => {
                if bytes.get(index + 1) == Some(&b'=') {
                    tokens.push(Token::GreaterEqual);
                    index += 2;
                } else {
                    tokens.push(Token::Greater);
                    index += 1;
                }
            }
            b'=' => {
                if bytes.get(index + 1) == Some(&b'=') {
                    tokens.push(Token::EqualEqual);
                    index += 2;
                } else {
                    return Err(unexpected(text, index));
                }
            }
            b'!' => {
                if bytes.get(index + 1) == Some(&b'=') {
                    tokens.push(Token::BangEqual);
                    index += 2;
                } else {
                    tokens.push(Token::Not);
                    index += 1;
                }
            }
            b'&' => {
                if bytes.get(index + 1) == Some(&b'&') {
                    tokens.push(Token::And);
                    index += 2;
                } else {
                    return Err(unexpected(text, index));
                }
            }
            b'|' => {
                if bytes.get(index + 1) == Some(&b'|') {
                    tokens.push(Token::Or);
                    index += 2;
                } else {
                    return Err(unexpected(text, index));
                }
            }
            b'0'..=b'9' | b'.' => {
                let start = index;
                while index < bytes.len() && (bytes[index].is_ascii_digit() || bytes[index] == b'.')
                {
                    index += 1;
                }
                let literal = &text[start..index];
                let value: f64 = literal.parse().map_err(|_| ExprError::MalformedNumber {
                    text: literal.to_string(),
                })?;
                if !value.is_finite() {
                    return Err(ExprError::MalformedNumber {
                        text: literal.to_string(),
                    });
                }
                tokens.push(Token::Number(value));
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let start = index;
                while index < bytes.len()
                    && (bytes[index].is_ascii_alphanumeric() || bytes[index] == b'_')
                {
                    index += 1;
                }
                let word = &text[start..index];
                match word {
                    "and" => tokens.push(Token::And),
                    "or" => tokens.push(Token::Or),
                    "not" => tokens.push(Token::Not),
                    _ => match Variable::parse(word) {
                        Some(variable) => tokens.push(Token::Var(variable)),
                        None => {
                            return Err(ExprError::UnknownIdentifier {
                                name: word.to_string(),
                            });
                        }
                    },
                }
            }
            _ => return Err(unexpected(text, index)),
        }
    }
    Ok(tokens)
}

/// Builds an unexpected-character error at a byte offset.
fn unexpected(text: &str, position: usize) -> ExprError {
    let found = text[position..].chars().next().unwrap_or('\u{fffd}');
    ExprError::UnexpectedCharacter {
        found,
        position,
    }
}
