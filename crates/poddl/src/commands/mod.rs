//! Command implementations for the poddl CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod check;
pub mod completions;
pub mod config;
pub mod podcasts;
pub mod render;
pub mod select;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter condition error.
    #[error("filter error: {0}")]
    Filter(#[from] poddl_filter::FilterError),

    /// Selection error.
    #[error("selection error: {0}")]
    Selection(#[from] poddl_filter::SelectionError),

    /// Podcast missing from the configuration.
    #[error("podcast '{name}' not found{}", .suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default())]
    PodcastNotFound {
        /// The requested name or index.
        name: String,
        /// Closest configured name, if any.
        suggestion: Option<String>,
    },

    /// Invalid command-line argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Config file override from `--config` or `PODDL_CONFIG`.
    pub config_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            config_path: cli.config.clone(),
        }
    }
}

/// Parses repeated `NAME=VALUE` arguments into a binding map.
///
/// Only the first `=` separates; the value may contain more. Later bindings
/// of the same name win.
pub fn parse_vars(vars: &[String]) -> Result<HashMap<String, String>> {
    vars.iter()
        .map(|var| {
            let (name, value) = var.split_once('=').ok_or_else(|| {
                CommandError::InvalidArgument(format!("expected NAME=VALUE, got '{var}'"))
            })?;
            if name.is_empty() {
                return Err(CommandError::InvalidArgument(format!(
                    "variable name is empty in '{var}'"
                )));
            }
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_vars() {
        let vars = parse_vars(&[
            "ItemTitle=Episode 1".to_string(),
            "ItemUrl=https://a.com/?x=1".to_string(),
            "Empty=".to_string(),
        ])
        .unwrap();
        assert_eq!(vars["ItemTitle"], "Episode 1");
        assert_eq!(vars["ItemUrl"], "https://a.com/?x=1");
        assert_eq!(vars["Empty"], "");
    }

    #[test]
    fn test_parse_vars_last_wins() {
        let vars = parse_vars(&["a=1".to_string(), "a=2".to_string()]).unwrap();
        assert_eq!(vars["a"], "2");
    }

    #[test]
    fn test_parse_vars_rejects_malformed() {
        assert!(matches!(
            parse_vars(&["novalue".to_string()]),
            Err(CommandError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_vars(&["=value".to_string()]),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_podcast_not_found_message() {
        let err = CommandError::PodcastNotFound {
            name: "rustradio".to_string(),
            suggestion: Some("rust-radio".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "podcast 'rustradio' not found (did you mean 'rust-radio'?)"
        );

        let err = CommandError::PodcastNotFound {
            name: "x".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "podcast 'x' not found");
    }

    #[test]
    fn test_context_from_cli() {
        let cli = Cli::parse_from([
            "poddl",
            "--json",
            "--no-color",
            "-q",
            "--config",
            "/tmp/poddl.toml",
            "podcasts",
        ]);
        let ctx = CommandContext::from_cli(&cli);
        assert!(ctx.json_output);
        assert!(!ctx.use_colors);
        assert!(ctx.quiet);
        assert_eq!(ctx.config_path, Some(PathBuf::from("/tmp/poddl.toml")));
    }
}
