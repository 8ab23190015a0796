//! Feed item filtering for the poddl podcast downloader.
//!
//! This crate holds the pure, in-memory part of poddl:
//!
//! - [`filter`] - the condition language that decides whether an item is
//!   downloaded, and the path templates that decide where it goes
//! - [`feed`] - the parsed feed model the pipeline works on
//! - [`selection`] - the pipeline that applies a podcast's settings to a feed
//!
//! Fetching feeds and transferring files happen elsewhere.

pub mod feed;
pub mod filter;
pub mod selection;

pub use feed::{Channel, Enclosure, FeedItem};
pub use filter::{evaluate_condition, render_template, FilterError, FilterResult};
pub use selection::{select, DownloadItem, SelectionError, SelectionSettings};
