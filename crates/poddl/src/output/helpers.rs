//! Common helper functions for output formatting.

use chrono::{DateTime, Utc};

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a byte count with a binary unit suffix.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = *next;
    }
    format!("{value:.1} {unit}")
}

/// Formats the last sync time relative to `now`.
pub fn format_last_synced(last_synced: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(synced) = last_synced else {
        return "Never".to_string();
    };

    let days = (now - synced).num_days();
    let ago = match days {
        d if d < 1 => "today".to_string(),
        1 => "1 day ago".to_string(),
        d => format!("{d} days ago"),
    };
    format!("{} [{}]", synced.format("%Y-%m-%d %H:%M"), ago)
}
