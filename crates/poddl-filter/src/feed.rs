//! Parsed podcast feed data.
//!
//! Feeds are fetched and parsed elsewhere; this module only models the fields
//! the selection pipeline reads.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A podcast channel and its items, newest first as published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel title.
    pub title: String,

    /// Feed items.
    #[serde(default)]
    pub items: Vec<FeedItem>,
}

impl Channel {
    /// Parses a channel from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A single feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Item title.
    pub title: String,

    /// Item description (may contain markup).
    #[serde(default)]
    pub description: String,

    /// Publish date, if the feed provided a parseable one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<DateTime<FixedOffset>>,

    /// Attached media files.
    #[serde(default)]
    pub enclosures: Vec<Enclosure>,
}

impl FeedItem {
    /// Variables available to filter conditions for one enclosure of this item:
    /// `ItemTitle`, `ItemDescription` and `ItemUrl`.
    pub fn condition_bindings(&self, enclosure: &Enclosure) -> HashMap<String, String> {
        HashMap::from([
            ("ItemTitle".to_string(), self.title.clone()),
            ("ItemDescription".to_string(), self.description.clone()),
            ("ItemUrl".to_string(), enclosure.url.clone()),
        ])
    }
}

/// A media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    /// Download URL.
    pub url: String,

    /// MIME type, e.g. `audio/mpeg`.
    #[serde(rename = "type", default)]
    pub media_type: String,

    /// Size in bytes as advertised by the feed.
    #[serde(default)]
    pub length: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_json() {
        let json = r#"{
            "title": "Rust Radio",
            "items": [
                {
                    "title": "Episode 1",
                    "description": "Ownership",
                    "pub_date": "2024-03-01T08:00:00+01:00",
                    "enclosures": [
                        {"url": "https://example.com/ep1.mp3", "type": "audio/mpeg", "length": 1024}
                    ]
                },
                {"title": "Announcement"}
            ]
        }"#;

        let channel = Channel::from_json(json).unwrap();
        assert_eq!(channel.title, "Rust Radio");
        assert_eq!(channel.items.len(), 2);

        let first = &channel.items[0];
        assert_eq!(first.enclosures[0].media_type, "audio/mpeg");
        assert_eq!(first.enclosures[0].length, 1024);
        assert_eq!(
            first.pub_date.unwrap().to_rfc3339(),
            "2024-03-01T08:00:00+01:00"
        );

        let second = &channel.items[1];
        assert!(second.pub_date.is_none());
        assert!(second.enclosures.is_empty());
        assert_eq!(second.description, "");
    }

    #[test]
    fn test_channel_from_invalid_json() {
        assert!(Channel::from_json("{\"items\": []}").is_err());
    }

    #[test]
    fn test_condition_bindings() {
        let item = FeedItem {
            title: "T".to_string(),
            description: "D".to_string(),
            pub_date: None,
            enclosures: vec![],
        };
        let enclosure = Enclosure {
            url: "https://example.com/a.mp3".to_string(),
            media_type: "audio/mpeg".to_string(),
            length: 0,
        };

        let bindings = item.condition_bindings(&enclosure);
        assert_eq!(bindings.len(), 3);
        assert_eq!(bindings["ItemTitle"], "T");
        assert_eq!(bindings["ItemDescription"], "D");
        assert_eq!(bindings["ItemUrl"], "https://example.com/a.mp3");
    }
}
