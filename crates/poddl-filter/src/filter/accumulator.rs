//! Condition accumulator: the state machine that assembles one
//! `'literal' [not] in [prefix|suffix] {{variable}}` test from the pieces the
//! lexer recognizes.

use super::error::{FilterError, FilterResult};

/// Keywords that shape a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `in` - separates the literal from the variable.
    In,
    /// `not` - negates the test; must precede `in`.
    Not,
    /// `prefix` - the variable must start with the literal.
    Prefix,
    /// `suffix` - the variable must end with the literal.
    Suffix,
}

impl Keyword {
    /// All condition keywords, in the order they are documented.
    pub const ALL: [Keyword; 4] = [Keyword::Not, Keyword::In, Keyword::Prefix, Keyword::Suffix];

    /// Parses a condition keyword. Matching is case-sensitive.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "in" => Some(Keyword::In),
            "not" => Some(Keyword::Not),
            "prefix" => Some(Keyword::Prefix),
            "suffix" => Some(Keyword::Suffix),
            _ => None,
        }
    }

    /// Returns the keyword as written in filter text.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::In => "in",
            Keyword::Not => "not",
            Keyword::Prefix => "prefix",
            Keyword::Suffix => "suffix",
        }
    }
}

/// How the literal is searched for inside the variable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Anywhere in the value.
    #[default]
    Contains,
    /// At the start of the value.
    Prefix,
    /// At the end of the value.
    Suffix,
}

/// A fully assembled condition, ready to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// The quoted literal to search for.
    pub needle: String,
    /// The value searched in.
    pub haystack: String,
    /// Where the needle must occur.
    pub mode: MatchMode,
    /// Whether the outcome is inverted.
    pub negate: bool,
}

impl Condition {
    /// Evaluates the condition.
    pub fn evaluate(&self) -> bool {
        let found = match self.mode {
            MatchMode::Contains => self.haystack.contains(self.needle.as_str()),
            MatchMode::Prefix => self.haystack.starts_with(self.needle.as_str()),
            MatchMode::Suffix => self.haystack.ends_with(self.needle.as_str()),
        };
        found != self.negate
    }
}

/// The accumulator's current state.
///
/// `negate` can only be set in [`State::HaveLeft`]; a modifier can only be
/// chosen in [`State::HaveLeftIn`]. Both are carried forward unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum State {
    /// Nothing seen since the last condition.
    #[default]
    Empty,
    /// The literal has been seen, optionally followed by `not`.
    HaveLeft { left: String, negate: bool },
    /// `in` has been seen.
    HaveLeftIn { left: String, negate: bool },
    /// `prefix` or `suffix` has been seen after `in`.
    HaveLeftInModifier {
        left: String,
        negate: bool,
        mode: MatchMode,
    },
    /// Both operands are present. Only observable transiently: the
    /// accumulator resets as soon as the result is taken.
    Complete(Condition),
}

/// Builds one condition at a time.
#[derive(Debug, Default)]
pub struct Accumulator {
    state: State,
}

impl Accumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Returns true when no condition is partially built.
    pub fn is_empty(&self) -> bool {
        matches!(self.state, State::Empty)
    }

    /// Feeds a literal (quoted text or a resolved variable).
    ///
    /// Returns `Some(result)` when the literal completed a condition. The
    /// accumulator is already reset to [`State::Empty`] at that point.
    pub fn add_literal(&mut self, value: String, position: usize) -> FilterResult<Option<bool>> {
        self.state = match std::mem::take(&mut self.state) {
            State::Empty => State::HaveLeft {
                left: value,
                negate: false,
            },
            State::HaveLeft { .. } => {
                return Err(FilterError::structural(
                    "missing 'in' between operands",
                    position,
                ));
            }
            State::HaveLeftIn { left, negate } => State::Complete(Condition {
                needle: left,
                haystack: value,
                mode: MatchMode::Contains,
                negate,
            }),
            State::HaveLeftInModifier { left, negate, mode } => State::Complete(Condition {
                needle: left,
                haystack: value,
                mode,
                negate,
            }),
            State::Complete(_) => {
                return Err(FilterError::structural("too many operands", position));
            }
        };

        Ok(self.take_result())
    }

    /// Feeds a condition keyword, enforcing keyword order.
    pub fn add_keyword(&mut self, keyword: Keyword, position: usize) -> FilterResult<()> {
        let next = match (std::mem::take(&mut self.state), keyword) {
            (State::HaveLeft { left, negate: false }, Keyword::Not) => {
                State::HaveLeft { left, negate: true }
            }
            (State::HaveLeft { left, negate }, Keyword::In) => State::HaveLeftIn { left, negate },
            (State::HaveLeftIn { left, negate }, Keyword::Prefix) => State::HaveLeftInModifier {
                left,
                negate,
                mode: MatchMode::Prefix,
            },
            (State::HaveLeftIn { left, negate }, Keyword::Suffix) => State::HaveLeftInModifier {
                left,
                negate,
                mode: MatchMode::Suffix,
            },
            (_, keyword) => {
                return Err(FilterError::keyword_out_of_order(keyword.as_str(), position));
            }
        };
        self.state = next;
        Ok(())
    }

    /// Evaluates and clears a completed condition.
    fn take_result(&mut self) -> Option<bool> {
        if !matches!(self.state, State::Complete(_)) {
            return None;
        }
        match std::mem::take(&mut self.state) {
            State::Complete(condition) => Some(condition.evaluate()),
            _ => None,
        }
    }

    /// Describes what is missing when a token arrives mid-condition.
    pub fn pending_reason(&self) -> Option<&'static str> {
        match self.state {
            State::Empty | State::Complete(_) => None,
            State::HaveLeft { .. } => Some("condition is missing 'in' and a variable"),
            State::HaveLeftIn { .. } | State::HaveLeftInModifier { .. } => {
                Some("condition is missing its right operand")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(acc: &mut Accumulator, literal: &str) -> Option<bool> {
        acc.add_literal(literal.to_string(), 0).unwrap()
    }

    #[test]
    fn test_contains_condition() {
        let mut acc = Accumulator::new();
        assert_eq!(feed(&mut acc, "SOME"), None);
        acc.add_keyword(Keyword::In, 0).unwrap();
        assert_eq!(feed(&mut acc, "SOME is title"), Some(true));
        assert!(acc.is_empty());
    }

    #[test]
    fn test_left_operand_is_searched_in_right() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "SOME is title");
        acc.add_keyword(Keyword::In, 0).unwrap();
        assert_eq!(feed(&mut acc, "SOME"), Some(false));
    }

    #[test]
    fn test_negated_prefix_condition() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "SOME");
        acc.add_keyword(Keyword::Not, 0).unwrap();
        acc.add_keyword(Keyword::In, 0).unwrap();
        acc.add_keyword(Keyword::Prefix, 0).unwrap();
        assert_eq!(
            acc.state(),
            &State::HaveLeftInModifier {
                left: "SOME".to_string(),
                negate: true,
                mode: MatchMode::Prefix,
            }
        );
        assert_eq!(feed(&mut acc, "SOME is title"), Some(false));
    }

    #[test]
    fn test_suffix_condition() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "title");
        acc.add_keyword(Keyword::In, 0).unwrap();
        acc.add_keyword(Keyword::Suffix, 0).unwrap();
        assert_eq!(feed(&mut acc, "SOME is title"), Some(true));
    }

    #[test]
    fn test_empty_literal_is_a_real_operand() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "");
        acc.add_keyword(Keyword::In, 0).unwrap();
        assert_eq!(feed(&mut acc, "anything"), Some(true));
    }

    #[test]
    fn test_not_before_left_operand_rejected() {
        let mut acc = Accumulator::new();
        let err = acc.add_keyword(Keyword::Not, 4).unwrap_err();
        assert_eq!(err, FilterError::keyword_out_of_order("not", 4));
    }

    #[test]
    fn test_not_after_in_rejected() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "x");
        acc.add_keyword(Keyword::In, 0).unwrap();
        assert!(acc.add_keyword(Keyword::Not, 0).is_err());
    }

    #[test]
    fn test_double_not_rejected() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "x");
        acc.add_keyword(Keyword::Not, 0).unwrap();
        assert!(acc.add_keyword(Keyword::Not, 0).is_err());
    }

    #[test]
    fn test_double_in_rejected() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "x");
        acc.add_keyword(Keyword::In, 0).unwrap();
        assert!(acc.add_keyword(Keyword::In, 0).is_err());
    }

    #[test]
    fn test_prefix_before_in_rejected() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "x");
        assert!(acc.add_keyword(Keyword::Prefix, 0).is_err());
    }

    #[test]
    fn test_prefix_and_suffix_exclusive() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "x");
        acc.add_keyword(Keyword::In, 0).unwrap();
        acc.add_keyword(Keyword::Prefix, 0).unwrap();
        assert!(acc.add_keyword(Keyword::Suffix, 0).is_err());
    }

    #[test]
    fn test_two_literals_without_in_rejected() {
        let mut acc = Accumulator::new();
        feed(&mut acc, "x");
        let err = acc.add_literal("y".to_string(), 7).unwrap_err();
        assert!(matches!(err, FilterError::Structural { position: 7, .. }));
    }

    #[test]
    fn test_pending_reason() {
        let mut acc = Accumulator::new();
        assert_eq!(acc.pending_reason(), None);
        feed(&mut acc, "x");
        assert!(acc.pending_reason().is_some());
        acc.add_keyword(Keyword::In, 0).unwrap();
        assert!(acc.pending_reason().is_some());
    }

    #[test]
    fn test_keyword_round_trip_names() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_word(keyword.as_str()), Some(keyword));
        }
        assert_eq!(Keyword::from_word("IN"), None);
    }
}
