//! Evaluation of a filter condition token stream.
//!
//! `and` and `or` fold strictly left to right with no precedence between
//! them: `A or B and C` is `(A or B) and C`. Parenthesized groups are
//! evaluated recursively and substitute as a single operand.

use std::collections::HashMap;

use super::error::{FilterError, FilterResult};
use super::lexer::{FilterToken, Lexer, PositionedToken};

/// Deepest parenthesis nesting the evaluator will follow.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Pulls tokens from a [`Lexer`] and folds them into a boolean.
pub struct FilterEvaluator<'a> {
    lexer: Lexer<'a>,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates an evaluator for `input` with the given variable bindings.
    pub fn new(input: &'a str, variables: &'a HashMap<String, String>) -> Self {
        Self::from_lexer(Lexer::new(input, variables))
    }

    /// Creates an evaluator over an existing token stream.
    pub fn from_lexer(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// Consumes the token stream and returns the folded result.
    ///
    /// Input with no conditions evaluates to `false`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the lexer, or a structural error
    /// when an operator is not followed by an operand or groups nest deeper
    /// than [`MAX_NESTING_DEPTH`].
    pub fn evaluate(mut self) -> FilterResult<bool> {
        self.evaluate_group(0)
    }

    fn next_token(&mut self) -> FilterResult<PositionedToken> {
        match self.lexer.next() {
            Some(token) => token,
            None => Err(FilterError::structural(
                "token stream ended unexpectedly",
                self.lexer.position(),
            )),
        }
    }

    /// Evaluates tokens until the end of input or the `)` closing this group.
    fn evaluate_group(&mut self, depth: usize) -> FilterResult<bool> {
        let mut result = false;

        loop {
            let PositionedToken { token, position } = self.next_token()?;
            match token {
                FilterToken::End if depth > 0 => {
                    return Err(FilterError::UnclosedLeftParen { position });
                }
                FilterToken::End | FilterToken::CloseGroup => return Ok(result),
                FilterToken::Condition(value) => result = value,
                FilterToken::OpenGroup => result = self.enter_group(depth, position)?,
                FilterToken::And => result &= self.operand(depth, "and")?,
                FilterToken::Or => result |= self.operand(depth, "or")?,
            }
        }
    }

    /// Reads the operand following `and` / `or`.
    fn operand(&mut self, depth: usize, operator: &str) -> FilterResult<bool> {
        let PositionedToken { token, position } = self.next_token()?;
        match token {
            FilterToken::Condition(value) => Ok(value),
            FilterToken::OpenGroup => self.enter_group(depth, position),
            _ => Err(FilterError::structural(
                format!("expected a condition or group after '{operator}'"),
                position,
            )),
        }
    }

    fn enter_group(&mut self, depth: usize, position: usize) -> FilterResult<bool> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(FilterError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                position,
            });
        }
        self.evaluate_group(depth + 1)
    }
}
