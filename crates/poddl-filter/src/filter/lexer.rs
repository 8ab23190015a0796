//! Lexer (tokenizer) for filter conditions.
//!
//! The lexer is a single-pass, pull-based token stream. Quoted literals,
//! `{{variable}}` placeholders and the condition keywords never surface as
//! tokens of their own: they are fed into an [`Accumulator`], and each time a
//! condition completes the lexer yields its boolean outcome.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use log::trace;
use strsim::levenshtein;

use super::accumulator::{Accumulator, Keyword};
use super::error::{FilterError, FilterResult};

/// Words that may appear outside quotes and placeholders.
const KNOWN_WORDS: [&str; 6] = ["and", "or", "not", "in", "prefix", "suffix"];

/// Maximum edit distance for a keyword suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// A token in a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterToken {
    /// The outcome of a completed condition.
    Condition(bool),

    /// The `and` operator.
    And,

    /// The `or` operator.
    Or,

    /// Opening parenthesis `(`.
    OpenGroup,

    /// Closing parenthesis `)`.
    CloseGroup,

    /// End of input with all groups closed.
    End,
}

/// A token with its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: FilterToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Lexer for filter conditions.
///
/// Yields `Ok` tokens in input order. The stream ends after
/// [`FilterToken::End`] or after the first `Err`; a fresh scan needs a fresh
/// lexer.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
    /// Nesting depth of `(`.
    depth: usize,
    accumulator: Accumulator,
    variables: &'a HashMap<String, String>,
    finished: bool,
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_end_of_line(c: char) -> bool {
    c == '\r' || c == '\n'
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `input`, resolving placeholders from `variables`.
    pub fn new(input: &'a str, variables: &'a HashMap<String, String>) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
            depth: 0,
            accumulator: Accumulator::new(),
            variables,
            finished: false,
        }
    }

    /// Returns the current byte position.
    pub fn position(&self) -> usize {
        self.position
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    fn skip_blanks(&mut self) {
        while let Some(&c) = self.peek() {
            if c == ' ' || c == '\t' {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Reads a quoted literal. The opening quote has not been consumed yet.
    fn read_quoted(&mut self, start: usize) -> FilterResult<String> {
        let Some(quote) = self.next_char() else {
            return Err(FilterError::UnterminatedString { position: start });
        };

        let mut literal = String::new();
        loop {
            match self.next_char() {
                Some(c) if c == quote => return Ok(literal),
                Some(c) if is_end_of_line(c) => {
                    return Err(FilterError::UnterminatedString { position: start });
                }
                Some(c) => literal.push(c),
                None => return Err(FilterError::UnterminatedString { position: start }),
            }
        }
    }

    /// Reads a placeholder name. The leading `{{` has been consumed.
    fn read_variable_name(&mut self, start: usize) -> FilterResult<String> {
        let mut name = String::new();
        loop {
            match self.next_char() {
                Some('}') => {
                    if self.next_char() != Some('}') {
                        return Err(FilterError::malformed_variable("expected '}}'", start));
                    }
                    if name.is_empty() {
                        return Err(FilterError::malformed_variable(
                            "variable name cannot be empty",
                            start,
                        ));
                    }
                    return Ok(name);
                }
                Some(c) if is_word_char(c) => name.push(c),
                Some(c) if is_end_of_line(c) => {
                    return Err(FilterError::malformed_variable("unexpected end of line", start));
                }
                Some(c) => {
                    return Err(FilterError::malformed_variable(
                        format!("invalid character {c:?} in variable name"),
                        start,
                    ));
                }
                None => {
                    return Err(FilterError::malformed_variable(
                        "unexpected end of input",
                        start,
                    ));
                }
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.peek() {
            if is_word_char(c) {
                word.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        word
    }

    fn resolve(&self, name: &str, start: usize) -> FilterResult<String> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| FilterError::variable_not_found(name, start))
    }

    /// Rejects structural tokens while a condition is half-built.
    fn ensure_no_pending(&self, start: usize) -> FilterResult<()> {
        match self.accumulator.pending_reason() {
            Some(reason) => Err(FilterError::structural(reason, start)),
            None => Ok(()),
        }
    }

    fn suggest(word: &str) -> Option<String> {
        let lower = word.to_lowercase();
        let (best, distance) = KNOWN_WORDS
            .iter()
            .map(|known| (*known, levenshtein(&lower, known)))
            .min_by_key(|(_, d)| *d)?;

        if distance <= MAX_SUGGESTION_DISTANCE {
            Some(best.to_string())
        } else {
            None
        }
    }

    /// Feeds a literal to the accumulator, returning a token if a condition completed.
    fn literal(&mut self, value: String, start: usize) -> FilterResult<Option<PositionedToken>> {
        Ok(self
            .accumulator
            .add_literal(value, start)?
            .map(|result| PositionedToken {
                token: FilterToken::Condition(result),
                position: start,
            }))
    }

    fn scan(&mut self) -> FilterResult<PositionedToken> {
        loop {
            self.skip_blanks();
            let start = self.position;
            let emit = |token: FilterToken| -> FilterResult<PositionedToken> {
                Ok(PositionedToken {
                    token,
                    position: start,
                })
            };

            let c = match self.peek() {
                Some(&c) if !is_end_of_line(c) => c,
                _ => {
                    self.ensure_no_pending(start)?;
                    if self.depth != 0 {
                        return Err(FilterError::UnclosedLeftParen { position: start });
                    }
                    return emit(FilterToken::End);
                }
            };

            match c {
                '\'' | '"' => {
                    let value = self.read_quoted(start)?;
                    if let Some(token) = self.literal(value, start)? {
                        return Ok(token);
                    }
                }
                '{' => {
                    self.next_char();
                    if self.peek() != Some(&'{') {
                        return Err(FilterError::UnrecognizedCharacter {
                            character: '{',
                            position: start,
                        });
                    }
                    self.next_char();
                    let name = self.read_variable_name(start)?;
                    let value = self.resolve(&name, start)?;
                    if let Some(token) = self.literal(value, start)? {
                        return Ok(token);
                    }
                }
                '(' => {
                    self.ensure_no_pending(start)?;
                    self.next_char();
                    self.depth += 1;
                    return emit(FilterToken::OpenGroup);
                }
                ')' => {
                    self.ensure_no_pending(start)?;
                    self.next_char();
                    if self.depth == 0 {
                        return Err(FilterError::UnexpectedRightParen { position: start });
                    }
                    self.depth -= 1;
                    return emit(FilterToken::CloseGroup);
                }
                _ if is_word_char(c) => {
                    let word = self.read_word();
                    match word.as_str() {
                        "and" => {
                            self.ensure_no_pending(start)?;
                            return emit(FilterToken::And);
                        }
                        "or" => {
                            self.ensure_no_pending(start)?;
                            return emit(FilterToken::Or);
                        }
                        _ => match Keyword::from_word(&word) {
                            Some(keyword) => self.accumulator.add_keyword(keyword, start)?,
                            None => {
                                return Err(FilterError::UnknownKeyword {
                                    suggestion: Self::suggest(&word),
                                    keyword: word,
                                    position: start,
                                });
                            }
                        },
                    }
                }
                _ => {
                    return Err(FilterError::UnrecognizedCharacter {
                        character: c,
                        position: start,
                    });
                }
            }
        }
    }

    /// Returns the next token, or `None` once the stream has ended.
    pub fn next_token(&mut self) -> Option<FilterResult<PositionedToken>> {
        if self.finished {
            return None;
        }

        let result = self.scan();
        match &result {
            Ok(PositionedToken {
                token: FilterToken::End,
                ..
            })
            | Err(_) => self.finished = true,
            Ok(_) => {}
        }
        trace!("filter token: {:?}", result);
        Some(result)
    }

    /// Collects all tokens, stopping at the first error.
    #[cfg(test)]
    pub fn tokenize(self) -> FilterResult<Vec<FilterToken>> {
        self.map(|t| t.map(|pt| pt.token)).collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = FilterResult<PositionedToken>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> HashMap<String, String> {
        HashMap::from([
            ("title".to_string(), "SOME is titile".to_string()),
            ("descr".to_string(), "OTHER is description".to_string()),
        ])
    }

    fn tokenize(input: &str) -> FilterResult<Vec<FilterToken>> {
        let vars = vars();
        Lexer::new(input, &vars).tokenize()
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(tokenize(""), Ok(vec![FilterToken::End]));
        assert_eq!(tokenize("   \t "), Ok(vec![FilterToken::End]));
    }

    #[test]
    fn test_tokenize_single_condition() {
        assert_eq!(
            tokenize("'SOME' in {{title}}"),
            Ok(vec![FilterToken::Condition(true), FilterToken::End])
        );
    }

    #[test]
    fn test_tokenize_double_quotes() {
        assert_eq!(
            tokenize("\"OTHER\" not in {{descr}}"),
            Ok(vec![FilterToken::Condition(false), FilterToken::End])
        );
    }

    #[test]
    fn test_quote_may_contain_other_quote_style() {
        let vars = HashMap::from([("v".to_string(), "it's here".to_string())]);
        let tokens = Lexer::new("\"it's\" in {{v}}", &vars).tokenize();
        assert_eq!(tokens, Ok(vec![FilterToken::Condition(true), FilterToken::End]));
    }

    #[test]
    fn test_tokenize_operators_and_groups() {
        assert_eq!(
            tokenize("('SOME' in {{title}} or 'x' in {{descr}}) and 'OTHER' in {{descr}}"),
            Ok(vec![
                FilterToken::OpenGroup,
                FilterToken::Condition(true),
                FilterToken::Or,
                FilterToken::Condition(false),
                FilterToken::CloseGroup,
                FilterToken::And,
                FilterToken::Condition(true),
                FilterToken::End,
            ])
        );
    }

    #[test]
    fn test_positions() {
        let vars = vars();
        let tokens: Vec<PositionedToken> = Lexer::new("('SOME' in {{title}})", &vars)
            .collect::<FilterResult<_>>()
            .unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 11, 20, 21]);
    }

    #[test]
    fn test_end_of_line_terminates_input() {
        assert_eq!(
            tokenize("'SOME' in {{title}}\n garbage ~"),
            Ok(vec![FilterToken::Condition(true), FilterToken::End])
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            tokenize("'SOME in {{title}}"),
            Err(FilterError::UnterminatedString { position: 0 })
        );
        assert!(matches!(
            tokenize("'SOME\n' in {{title}}"),
            Err(FilterError::UnterminatedString { .. })
        ));
    }

    #[test]
    fn test_empty_variable_name() {
        let err = tokenize("'SOME' in {{}}").unwrap_err();
        assert!(matches!(err, FilterError::MalformedVariable { position: 10, .. }));
    }

    #[test]
    fn test_unterminated_variable() {
        assert!(matches!(
            tokenize("'SOME' in {{title"),
            Err(FilterError::MalformedVariable { .. })
        ));
        assert!(matches!(
            tokenize("'SOME' in {{ti-tle}}"),
            Err(FilterError::MalformedVariable { .. })
        ));
    }

    #[test]
    fn test_single_brace_is_unrecognized() {
        assert_eq!(
            tokenize("'SOME' in {title}"),
            Err(FilterError::UnrecognizedCharacter {
                character: '{',
                position: 10
            })
        );
    }

    #[test]
    fn test_missing_variable() {
        assert_eq!(
            tokenize("'SOME' in {{nope}}"),
            Err(FilterError::variable_not_found("nope", 10))
        );
    }

    #[test]
    fn test_unknown_keyword_with_suggestion() {
        let err = tokenize("'SOME' in prefx {{title}}").unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownKeyword {
                keyword: "prefx".to_string(),
                suggestion: Some("prefix".to_string()),
                position: 10,
            }
        );
        assert!(err.to_string().contains("did you mean 'prefix'"));
    }

    #[test]
    fn test_unknown_keyword_without_suggestion() {
        let err = tokenize("'SOME' contains {{title}}").unwrap_err();
        assert!(matches!(
            err,
            FilterError::UnknownKeyword {
                suggestion: None,
                ..
            }
        ));
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert!(matches!(
            tokenize("'SOME' IN {{title}}"),
            Err(FilterError::UnknownKeyword { .. })
        ));
    }

    #[test]
    fn test_unrecognized_character() {
        assert_eq!(
            tokenize("'SOME' in {{title}} & 'x' in {{descr}}"),
            Err(FilterError::UnrecognizedCharacter {
                character: '&',
                position: 20
            })
        );
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(matches!(
            tokenize("(('SOME' not in {{title}})"),
            Err(FilterError::UnclosedLeftParen { .. })
        ));
        assert!(matches!(
            tokenize("('SOME' not in {{title}}))"),
            Err(FilterError::UnexpectedRightParen { position: 25 })
        ));
    }

    #[test]
    fn test_stream_stops_after_error() {
        let vars = vars();
        let mut lexer = Lexer::new("'SOME' in {{title}} ) and", &vars);
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_stream_stops_after_end() {
        let vars = vars();
        let mut lexer = Lexer::new("", &vars);
        assert!(matches!(
            lexer.next(),
            Some(Ok(PositionedToken {
                token: FilterToken::End,
                ..
            }))
        ));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_operator_inside_condition_rejected() {
        assert!(matches!(
            tokenize("'SOME' in and {{title}}"),
            Err(FilterError::Structural { position: 10, .. })
        ));
        assert!(matches!(
            tokenize("'SOME' in"),
            Err(FilterError::Structural { .. })
        ));
        assert!(matches!(
            tokenize("'SOME' (in {{title}})"),
            Err(FilterError::Structural { .. })
        ));
    }

    #[test]
    fn test_unicode_literal_positions() {
        let vars = HashMap::from([("v".to_string(), "Épisode été".to_string())]);
        let err = Lexer::new("'été' in {{v}} ?", &vars).tokenize().unwrap_err();
        assert_eq!(
            err,
            FilterError::UnrecognizedCharacter {
                character: '?',
                position: 17
            }
        );
    }
}
