//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::{self, select::SelectOptions, CommandContext, CommandError, Result};

/// A parsed command borrowed from the CLI arguments.
#[derive(Debug)]
pub enum Dispatch<'a> {
    Check {
        filter: &'a str,
        vars: &'a [String],
    },
    Render {
        template: &'a str,
        vars: &'a [String],
    },
    Select(SelectOptions<'a>),
    Podcasts,
    Add {
        url: &'a str,
        name: &'a str,
    },
    Remove(&'a str),
    Reset(Option<&'a str>),
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    /// Maps the CLI command to its handler.
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Check { filter, vars }) => Self::Check { filter, vars },
            Some(Commands::Render { template, vars }) => Self::Render { template, vars },
            Some(Commands::Select {
                podcast,
                feed,
                count,
                start_date,
            }) => Self::Select(SelectOptions {
                podcast,
                feed,
                count: *count,
                start_date: start_date.as_deref(),
            }),
            Some(Commands::Podcasts) => Self::Podcasts,
            Some(Commands::Add { url, name }) => Self::Add { url, name },
            Some(Commands::Remove { podcast }) => Self::Remove(podcast),
            Some(Commands::Reset { podcast }) => Self::Reset(podcast.as_deref()),
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(shell),
            None => Self::Help,
        }
    }

    /// Runs the command.
    pub fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Check { filter, vars } => commands::check::execute(ctx, filter, vars),
            Self::Render { template, vars } => commands::render::execute(ctx, template, vars),
            Self::Select(opts) => commands::select::execute(ctx, opts),
            Self::Podcasts => commands::podcasts::execute(ctx),
            Self::Add { url, name } => commands::config::execute_add(ctx, url, name),
            Self::Remove(podcast) => commands::config::execute_remove(ctx, podcast),
            Self::Reset(podcast) => commands::config::execute_reset(ctx, *podcast),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("poddl - select podcast episodes to download");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Init { force }) => commands::config::execute_init(ctx, *force),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_dispatch_check() {
        let cli = Cli::parse_from(["poddl", "check", "'a' in {{x}}", "--var", "x=a"]);
        match Dispatch::from_cli(&cli) {
            Dispatch::Check { filter, vars } => {
                assert_eq!(filter, "'a' in {{x}}");
                assert_eq!(vars, ["x=a"]);
            }
            other => panic!("unexpected dispatch: {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_select() {
        let cli = Cli::parse_from(["poddl", "select", "1", "--feed", "f.json"]);
        match Dispatch::from_cli(&cli) {
            Dispatch::Select(opts) => {
                assert_eq!(opts.podcast, "1");
                assert_eq!(opts.feed, Path::new("f.json"));
                assert_eq!(opts.count, None);
                assert_eq!(opts.start_date, None);
            }
            other => panic!("unexpected dispatch: {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_add_remove_reset() {
        let cli = Cli::parse_from(["poddl", "add", "https://a.example.com/feed", "alpha"]);
        assert!(matches!(
            Dispatch::from_cli(&cli),
            Dispatch::Add {
                url: "https://a.example.com/feed",
                name: "alpha"
            }
        ));

        let cli = Cli::parse_from(["poddl", "remove", "alpha"]);
        assert!(matches!(Dispatch::from_cli(&cli), Dispatch::Remove("alpha")));

        let cli = Cli::parse_from(["poddl", "reset"]);
        assert!(matches!(Dispatch::from_cli(&cli), Dispatch::Reset(None)));

        let cli = Cli::parse_from(["poddl", "reset", "2"]);
        assert!(matches!(Dispatch::from_cli(&cli), Dispatch::Reset(Some("2"))));
    }

    #[test]
    fn test_dispatch_config_defaults_to_show() {
        let cli = Cli::parse_from(["poddl", "config"]);
        assert!(matches!(Dispatch::from_cli(&cli), Dispatch::Config(None)));
    }

    #[test]
    fn test_dispatch_help() {
        let cli = Cli::parse_from(["poddl"]);
        assert!(matches!(Dispatch::from_cli(&cli), Dispatch::Help));
    }
}
