//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the poddl CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// poddl - select podcast episodes to download
#[derive(Parser, Debug)]
#[command(name = "poddl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the config file
    #[arg(long, global = true, env = "PODDL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a filter condition
    #[command(alias = "c")]
    Check {
        /// Filter condition, e.g. "'News' in prefix {{ItemTitle}}"
        filter: String,

        /// Variable binding as NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", action = clap::ArgAction::Append)]
        vars: Vec<String>,
    },

    /// Render a path template
    #[command(alias = "r")]
    Render {
        /// Template, e.g. "{{Name}}/{{ItemPubDate}}"
        template: String,

        /// Variable binding as NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", action = clap::ArgAction::Append)]
        vars: Vec<String>,
    },

    /// Select the episodes of a configured podcast to download
    #[command(alias = "s")]
    Select {
        /// Podcast name or 1-based index
        podcast: String,

        /// Parsed feed as JSON
        #[arg(short, long)]
        feed: PathBuf,

        /// Maximum number of downloads
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Only items published on or after this date (YYYYMMDD, YYYY/MM/DD or YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
    },

    /// List configured podcasts
    #[command(alias = "p")]
    Podcasts,

    /// Add a podcast to the configuration
    #[command(alias = "a")]
    Add {
        /// Feed URL
        url: String,

        /// Name used to refer to the podcast
        name: String,
    },

    /// Remove a podcast from the configuration
    #[command(alias = "rm")]
    Remove {
        /// Podcast name or 1-based index
        podcast: String,
    },

    /// Forget the last sync time so the next sync starts from the beginning
    Reset {
        /// Podcast name or 1-based index (all podcasts when omitted)
        podcast: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print config file path
    Path,
}
