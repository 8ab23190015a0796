//! Output formatting utilities for the poddl CLI.
//!
//! This module provides functions for formatting data as tables or JSON:
//!
//! - [`downloads`] - Selected downloads (select)
//! - [`podcasts`] - Configured podcasts (podcasts)
//! - [`helpers`] - Common formatting utilities (truncation, sizes, sync age)

mod downloads;
pub mod helpers;
mod podcasts;

pub use downloads::{format_downloads_json, format_downloads_table, DownloadRow};
pub use podcasts::{format_podcasts_json, format_podcasts_table};
