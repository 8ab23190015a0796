//! Podcast list output formatting.

use chrono::Utc;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::config::EffectivePodcast;

use super::helpers::format_last_synced;

/// JSON output structure for the podcasts command.
#[derive(Serialize)]
struct PodcastsOutput<'a> {
    podcasts: Vec<PodcastOutput<'a>>,
}

#[derive(Serialize)]
struct PodcastOutput<'a> {
    index: usize,
    #[serde(flatten)]
    podcast: &'a EffectivePodcast,
}

/// Formats podcasts as JSON.
pub fn format_podcasts_json(podcasts: &[EffectivePodcast]) -> Result<String, serde_json::Error> {
    let output = PodcastsOutput {
        podcasts: podcasts
            .iter()
            .enumerate()
            .map(|(n, podcast)| PodcastOutput {
                index: n + 1,
                podcast,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats podcasts as an indexed list.
pub fn format_podcasts_table(podcasts: &[EffectivePodcast], use_colors: bool) -> String {
    if podcasts.is_empty() {
        return "No podcasts configured.\n".to_string();
    }

    let now = Utc::now();
    let mut output = String::new();

    for (n, podcast) in podcasts.iter().enumerate() {
        let num = format!("[{}]", n + 1);
        let (num, disabled) = if use_colors {
            (num.magenta().to_string(), "[disabled]".yellow().to_string())
        } else {
            (num, "[disabled]".to_string())
        };

        output.push_str(&num);
        output.push(' ');
        output.push_str(&podcast.name);
        if podcast.disabled {
            output.push(' ');
            output.push_str(&disabled);
        }
        output.push('\n');
        output.push_str(&format!("    Url         : {}\n", podcast.url));
        output.push_str(&format!(
            "    Last synced : {}\n",
            format_last_synced(podcast.last_synced, now)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn podcast(name: &str, disabled: bool) -> EffectivePodcast {
        EffectivePodcast {
            name: name.to_string(),
            url: format!("https://{name}.example.com/feed"),
            last_synced: None,
            download_path: PathBuf::from("/srv/podcasts"),
            separate_dir: String::new(),
            disabled,
            date_format: "%Y%m%d".to_string(),
            filter: String::new(),
            media_types: vec![],
        }
    }

    #[test]
    fn test_podcasts_table() {
        let table = format_podcasts_table(&[podcast("a", false), podcast("b", true)], false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "[1] a");
        assert_eq!(lines[1], "    Url         : https://a.example.com/feed");
        assert_eq!(lines[2], "    Last synced : Never");
        assert_eq!(lines[3], "[2] b [disabled]");
    }

    #[test]
    fn test_podcasts_table_empty() {
        assert_eq!(format_podcasts_table(&[], false), "No podcasts configured.\n");
    }

    #[test]
    fn test_podcasts_json() {
        let json = format_podcasts_json(&[podcast("a", false)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["podcasts"][0]["index"], 1);
        assert_eq!(value["podcasts"][0]["name"], "a");
        assert_eq!(value["podcasts"][0]["disabled"], false);
        assert!(value["podcasts"][0]["last_synced"].is_null());
    }
}
