//! Select command implementation.
//!
//! Applies a podcast's configured rules to a parsed feed and prints the
//! resulting download list.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, Utc};
use log::{info, warn};
use poddl_filter::{select, Channel, SelectionSettings};

use super::config::{load_config, EffectivePodcast};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_downloads_json, format_downloads_table, DownloadRow};

/// Accepted `--start-date` layouts.
const START_DATE_FORMATS: [&str; 3] = ["%Y%m%d", "%Y/%m/%d", "%Y-%m-%d"];

/// Options for the select command.
#[derive(Debug)]
pub struct SelectOptions<'a> {
    /// Podcast name or 1-based index.
    pub podcast: &'a str,
    /// Path to the parsed feed JSON.
    pub feed: &'a Path,
    /// Maximum number of downloads.
    pub count: Option<usize>,
    /// Earliest publish date to accept.
    pub start_date: Option<&'a str>,
}

/// Executes the select command.
pub fn execute(ctx: &CommandContext, opts: &SelectOptions) -> Result<()> {
    let config = load_config(ctx.config_path.as_deref())?;
    let (name, entry) = config.find_podcast(opts.podcast)?;
    let podcast = config.effective(name, entry);

    let start_date = opts.start_date.map(parse_start_date).transpose()?;

    let rows = if podcast.disabled {
        warn!("podcast '{}' is disabled, nothing selected", podcast.name);
        Vec::new()
    } else {
        let content = fs::read_to_string(opts.feed)?;
        let channel = Channel::from_json(&content)?;
        info!(
            "{}: {} items in feed '{}'",
            podcast.name,
            channel.items.len(),
            channel.title
        );

        let settings = selection_settings(&podcast, opts.count, start_date);
        select(&channel, &settings, Local::now())?
            .into_iter()
            .map(|item| DownloadRow::new(&podcast.download_path, item))
            .collect()
    };

    if ctx.json_output {
        println!("{}", format_downloads_json(&podcast.name, &rows)?);
    } else if !ctx.quiet {
        print!("{}", format_downloads_table(&rows, ctx.use_colors));
    }

    Ok(())
}

/// Builds selection rules from resolved podcast settings and flags.
pub fn selection_settings(
    podcast: &EffectivePodcast,
    count: Option<usize>,
    start_date: Option<DateTime<Utc>>,
) -> SelectionSettings {
    SelectionSettings {
        podcast_name: podcast.name.clone(),
        media_types: podcast.media_types.clone(),
        count,
        start_date,
        last_synced: podcast.last_synced,
        filter: podcast.filter.clone(),
        date_format: podcast.date_format.clone(),
        separate_dir: podcast.separate_dir.clone(),
    }
}

/// Parses `--start-date` as midnight UTC of the given day.
pub fn parse_start_date(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    START_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CommandError::InvalidArgument(format!(
                "invalid start date '{input}', expected YYYYMMDD, YYYY/MM/DD or YYYY-MM-DD"
            ))
        })
}
