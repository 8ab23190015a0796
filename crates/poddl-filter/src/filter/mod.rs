//! Filter condition engine and path templates.
//!
//! Podcast configurations carry two small languages: a boolean condition that
//! decides whether a feed item is downloaded, and a path template that
//! decides where it goes.
//!
//! # Condition Syntax
//!
//! ```text
//! filter     := clause ( ("and" | "or") clause )*
//! clause     := condition | "(" filter ")"
//! condition  := quoted ["not"] "in" ["prefix"|"suffix"] placeholder
//! quoted     := "'" text "'" | "\"" text "\""
//! placeholder:= "{{" identifier "}}"
//! ```
//!
//! - `in` - the quoted text occurs anywhere in the variable
//! - `in prefix` - the variable starts with the quoted text
//! - `in suffix` - the variable ends with the quoted text
//! - `not` - inverts the test
//!
//! `and` and `or` have equal precedence and fold left to right.
//!
//! # Templates
//!
//! `{{Name}}` placeholders (ASCII letters) are replaced by their binding;
//! unbound names render empty.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use poddl_filter::filter::{evaluate_condition, render_template};
//!
//! let item = HashMap::from([
//!     ("ItemTitle".to_string(), "Weekly News #42".to_string()),
//!     ("ItemDescription".to_string(), "Bonus: interview".to_string()),
//! ]);
//! let keep = evaluate_condition(
//!     "'News' in prefix {{ItemTitle}} and 'Bonus' not in {{ItemDescription}}",
//!     &item,
//! )
//! .unwrap();
//! assert!(!keep);
//!
//! let path = HashMap::from([("Name".to_string(), "weekly".to_string())]);
//! assert_eq!(render_template("{{Name}}/{{CurrentDate}}", &path), "weekly/");
//! ```

mod accumulator;
mod error;
mod evaluator;
mod facade;
mod lexer;
mod template;

pub use accumulator::{Accumulator, Condition, Keyword, MatchMode, State};
pub use error::{FilterError, FilterResult};
pub use evaluator::{FilterEvaluator, MAX_NESTING_DEPTH};
pub use facade::{evaluate_condition, render_template};
pub use lexer::{FilterToken, Lexer, PositionedToken};
