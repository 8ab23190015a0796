//! Podcasts command implementation.
//!
//! Lists configured podcasts with their index, feed URL and sync state.

use super::config::load_config;
use super::{CommandContext, Result};
use crate::output::{format_podcasts_json, format_podcasts_table};

/// Executes the podcasts command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let config = load_config(ctx.config_path.as_deref())?;
    let podcasts: Vec<_> = config
        .podcasts
        .iter()
        .map(|(name, entry)| config.effective(name, entry))
        .collect();

    if ctx.json_output {
        println!("{}", format_podcasts_json(&podcasts)?);
    } else if !ctx.quiet {
        print!("{}", format_podcasts_table(&podcasts, ctx.use_colors));
    }

    Ok(())
}
