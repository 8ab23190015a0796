//! Error types for the filter engine.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while scanning or evaluating a filter condition.
///
/// Every variant describes malformed input; none of them are retryable.
/// `position` is the byte offset into the filter text where scanning stopped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A quoted literal reached the end of the line without its closing quote.
    #[error("unterminated quoted string, pos: {position}")]
    UnterminatedString {
        /// Scan position.
        position: usize,
    },

    /// A `{{` placeholder was empty, unterminated, or contained an illegal character.
    #[error("malformed variable: {reason}, pos: {position}")]
    MalformedVariable {
        /// What was wrong with the placeholder.
        reason: String,
        /// Scan position.
        position: usize,
    },

    /// A character that cannot start any token.
    #[error("unrecognized character: {character:?}, pos: {position}")]
    UnrecognizedCharacter {
        /// The offending character.
        character: char,
        /// Scan position.
        position: usize,
    },

    /// A `)` without a matching `(`.
    #[error("unexpected right paren, pos: {position}")]
    UnexpectedRightParen {
        /// Scan position.
        position: usize,
    },

    /// End of input reached with open groups.
    #[error("unclosed left paren, pos: {position}")]
    UnclosedLeftParen {
        /// Scan position.
        position: usize,
    },

    /// A known keyword used out of its legal sequence.
    #[error("malformed expression: unexpected '{keyword}', pos: {position}")]
    KeywordOutOfOrder {
        /// The misplaced keyword.
        keyword: String,
        /// Scan position.
        position: usize,
    },

    /// A word that is not one of the filter keywords.
    #[error("unknown keyword: {keyword}{}, pos: {position}", suggestion_suffix(.suggestion))]
    UnknownKeyword {
        /// The unrecognized word.
        keyword: String,
        /// Closest known keyword, if any is near enough.
        suggestion: Option<String>,
        /// Scan position.
        position: usize,
    },

    /// A placeholder inside a condition names a variable missing from the bindings.
    #[error("variable {name} was not found in provided data, pos: {position}")]
    VariableNotFound {
        /// The variable name.
        name: String,
        /// Scan position.
        position: usize,
    },

    /// A condition or operator is missing a part.
    #[error("malformed expression: {reason}, pos: {position}")]
    Structural {
        /// What is missing.
        reason: String,
        /// Scan position.
        position: usize,
    },

    /// Parenthesis nesting exceeded the evaluator's limit.
    #[error("groups nested deeper than {limit}, pos: {position}")]
    NestingTooDeep {
        /// The nesting limit.
        limit: usize,
        /// Scan position.
        position: usize,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates a malformed variable error.
    pub fn malformed_variable(reason: impl Into<String>, position: usize) -> Self {
        FilterError::MalformedVariable {
            reason: reason.into(),
            position,
        }
    }

    /// Creates a keyword ordering error.
    pub fn keyword_out_of_order(keyword: impl Into<String>, position: usize) -> Self {
        FilterError::KeywordOutOfOrder {
            keyword: keyword.into(),
            position,
        }
    }

    /// Creates a structural error.
    pub fn structural(reason: impl Into<String>, position: usize) -> Self {
        FilterError::Structural {
            reason: reason.into(),
            position,
        }
    }

    /// Creates a variable-not-found error.
    pub fn variable_not_found(name: impl Into<String>, position: usize) -> Self {
        FilterError::VariableNotFound {
            name: name.into(),
            position,
        }
    }

    /// Returns the scan position at which the error was detected.
    pub fn position(&self) -> usize {
        match self {
            FilterError::UnterminatedString { position }
            | FilterError::MalformedVariable { position, .. }
            | FilterError::UnrecognizedCharacter { position, .. }
            | FilterError::UnexpectedRightParen { position }
            | FilterError::UnclosedLeftParen { position }
            | FilterError::KeywordOutOfOrder { position, .. }
            | FilterError::UnknownKeyword { position, .. }
            | FilterError::VariableNotFound { position, .. }
            | FilterError::Structural { position, .. }
            | FilterError::NestingTooDeep { position, .. } => *position,
        }
    }

    /// Returns true for errors raised while splitting the text into tokens.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            FilterError::UnterminatedString { .. }
                | FilterError::MalformedVariable { .. }
                | FilterError::UnrecognizedCharacter { .. }
                | FilterError::UnexpectedRightParen { .. }
                | FilterError::UnclosedLeftParen { .. }
        )
    }

    /// Returns true for keywords that are known but misplaced, or unknown.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            FilterError::KeywordOutOfOrder { .. } | FilterError::UnknownKeyword { .. }
        )
    }
}
