//! Item selection: decides which enclosures of a channel to download and where.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, Local, TimeZone, Utc};
use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::feed::{Channel, FeedItem};
use crate::filter::{evaluate_condition, render_template, FilterError};

/// Default strftime pattern for `{{CurrentDate}}` and `{{ItemPubDate}}`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y%m%d";

/// Errors that abort selection for a podcast.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The podcast's filter condition could not be evaluated.
    #[error("filter for podcast '{podcast}' is invalid: {source}")]
    InvalidFilter {
        /// Podcast name.
        podcast: String,
        /// The underlying filter error.
        source: FilterError,
    },

    /// The date format is not a valid strftime pattern.
    #[error("invalid date format '{format}' for podcast '{podcast}'")]
    InvalidDateFormat {
        /// Podcast name.
        podcast: String,
        /// The rejected pattern.
        format: String,
    },
}

/// Per-podcast selection rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSettings {
    /// Podcast name as configured; bound to `{{Name}}`.
    pub podcast_name: String,
    /// Accepted media type prefixes; empty accepts everything.
    pub media_types: Vec<String>,
    /// Maximum number of downloads; `None` is unlimited.
    pub count: Option<usize>,
    /// Skip items published before this instant. Takes priority over `last_synced`.
    pub start_date: Option<DateTime<Utc>>,
    /// Skip items published before the last sync.
    pub last_synced: Option<DateTime<Utc>>,
    /// Filter condition; empty accepts everything.
    pub filter: String,
    /// strftime pattern for date placeholders.
    pub date_format: String,
    /// Sub-directory template; empty downloads into the podcast root.
    pub separate_dir: String,
}

impl SelectionSettings {
    /// Creates settings that accept every item of the named podcast.
    pub fn new(podcast_name: impl Into<String>) -> Self {
        Self {
            podcast_name: podcast_name.into(),
            media_types: Vec::new(),
            count: None,
            start_date: None,
            last_synced: None,
            filter: String::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            separate_dir: String::new(),
        }
    }
}

/// One file to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadItem {
    /// Channel title, used in progress output.
    pub title: String,
    /// Item title.
    pub item_title: String,
    /// Rendered sub-directory; empty for none.
    pub dir: String,
    /// Target file name derived from the URL.
    pub filename: String,
    /// Download URL.
    pub url: String,
    /// Advertised size in bytes.
    pub size: u64,
}

/// Selects the enclosures of `channel` to download.
///
/// `now` is bound to `{{CurrentDate}}`.
///
/// # Errors
///
/// Returns [`SelectionError::InvalidFilter`] on the first enclosure whose
/// condition fails to evaluate, and [`SelectionError::InvalidDateFormat`]
/// when a path template needs a date and the pattern is invalid.
pub fn select(
    channel: &Channel,
    settings: &SelectionSettings,
    now: DateTime<Local>,
) -> Result<Vec<DownloadItem>, SelectionError> {
    let mut downloads = Vec::new();

    for item in &channel.items {
        if !passes_date_gate(item, settings) {
            continue;
        }

        for enclosure in &item.enclosures {
            if !settings.media_types.is_empty()
                && !settings
                    .media_types
                    .iter()
                    .any(|t| enclosure.media_type.starts_with(t.trim()))
            {
                debug!("skipped by media type: {}", item.title);
                continue;
            }

            let bindings = item.condition_bindings(enclosure);
            let keep = evaluate_condition(&settings.filter, &bindings).map_err(|source| {
                SelectionError::InvalidFilter {
                    podcast: settings.podcast_name.clone(),
                    source,
                }
            })?;
            if !keep {
                debug!("skipped by filter condition: {}", item.title);
                continue;
            }

            let dir = if settings.separate_dir.is_empty() {
                String::new()
            } else {
                let bindings = path_bindings(channel, item, settings, now)?;
                relative_dir(&render_template(&settings.separate_dir, &bindings))
            };

            debug!("added to download list: {}", item.title);
            downloads.push(DownloadItem {
                title: channel.title.clone(),
                item_title: item.title.clone(),
                dir,
                filename: file_name_from_url(&enclosure.url),
                url: enclosure.url.clone(),
                size: enclosure.length,
            });
        }
    }

    if let Some(count) = settings.count {
        downloads.truncate(count);
    }

    Ok(downloads)
}

fn passes_date_gate(item: &FeedItem, settings: &SelectionSettings) -> bool {
    let Some(published) = item.pub_date.map(|d| d.with_timezone(&Utc)) else {
        return true;
    };

    if let Some(start) = settings.start_date {
        if published < start {
            debug!("skipped by start date: {}", item.title);
            return false;
        }
    } else if let Some(synced) = settings.last_synced {
        if published < synced {
            debug!("skipped by last sync: {}", item.title);
            return false;
        }
    }
    true
}

/// Variables available to the sub-directory template.
fn path_bindings(
    channel: &Channel,
    item: &FeedItem,
    settings: &SelectionSettings,
    now: DateTime<Local>,
) -> Result<HashMap<String, String>, SelectionError> {
    let item_date = match item.pub_date {
        Some(date) => format_date(&date, settings)?,
        None => String::new(),
    };

    Ok(HashMap::from([
        ("Title".to_string(), channel.title.clone()),
        ("Name".to_string(), settings.podcast_name.clone()),
        ("ItemTitle".to_string(), item.title.clone()),
        ("CurrentDate".to_string(), format_date(&now, settings)?),
        ("ItemPubDate".to_string(), item_date),
    ]))
}

fn format_date<Tz>(
    date: &DateTime<Tz>,
    settings: &SelectionSettings,
) -> Result<String, SelectionError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", date.format(&settings.date_format)).map_err(|_| {
        SelectionError::InvalidDateFormat {
            podcast: settings.podcast_name.clone(),
            format: settings.date_format.clone(),
        }
    })?;
    Ok(out)
}

/// Derives a file name from the last path segment of `url`.
///
/// Query and fragment are dropped and the segment is percent-decoded with
/// `+` read as a space. Separators that appear after decoding become `_`, and
/// a decoded `.` or `..` becomes `_`, so the name is always a single
/// component.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    let name = percent_decode(segment).replace(['/', '\\'], "_");
    match name.as_str() {
        "." | ".." => "_".to_string(),
        _ => name,
    }
}

/// Normalizes a rendered sub-directory to a relative path.
///
/// Empty, `.` and `..` components are dropped along with leading separators;
/// both `/` and `\` separate components. The result is joined with `/`.
pub fn relative_dir(rendered: &str) -> String {
    rendered
        .split(['/', '\\'])
        .filter(|part| !matches!(*part, "" | "." | ".."))
        .collect::<Vec<_>>()
        .join("/")
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
