//! Download list output formatting.

use std::path::{Component, Path, PathBuf};

use owo_colors::OwoColorize;
use poddl_filter::DownloadItem;
use serde::Serialize;

use super::helpers::{format_size, truncate_str};

/// A selected download with its resolved target path.
#[derive(Debug, Serialize)]
pub struct DownloadRow {
    pub title: String,
    pub item_title: String,
    pub url: String,
    pub size: u64,
    pub path: PathBuf,
}

impl DownloadRow {
    /// Joins the download root, the rendered sub-directory and the file name.
    ///
    /// Only plain components of `dir` and `filename` are joined, so the
    /// result always stays under `download_path`.
    pub fn new(download_path: &Path, item: DownloadItem) -> Self {
        let mut path = download_path.to_path_buf();
        for part in [item.dir.as_str(), item.filename.as_str()] {
            path.extend(Path::new(part).components().filter_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            }));
        }

        Self {
            title: item.title,
            item_title: item.item_title,
            url: item.url,
            size: item.size,
            path,
        }
    }
}

/// JSON output structure for the select command.
#[derive(Serialize)]
struct DownloadsOutput<'a> {
    podcast: &'a str,
    downloads: &'a [DownloadRow],
}

/// Formats downloads as JSON.
pub fn format_downloads_json(podcast: &str, rows: &[DownloadRow]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&DownloadsOutput {
        podcast,
        downloads: rows,
    })
}

/// Formats downloads as a table.
pub fn format_downloads_table(rows: &[DownloadRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "Nothing to download.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<4} {:<40} {:>10}  {}", "#", "Episode", "Size", "Path");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for (n, row) in rows.iter().enumerate() {
        let num = format!("{:<4}", n + 1);
        let num = if use_colors {
            num.magenta().to_string()
        } else {
            num
        };
        output.push_str(&format!(
            "{} {:<40} {:>10}  {}\n",
            num,
            truncate_str(&row.item_title, 40),
            format_size(row.size),
            row.path.display()
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(dir: &str) -> DownloadRow {
        DownloadRow::new(
            Path::new("/srv/podcasts"),
            DownloadItem {
                title: "The Changelog".to_string(),
                item_title: "Rust in production".to_string(),
                dir: dir.to_string(),
                filename: "rust-prod.mp3".to_string(),
                url: "https://cdn.example.com/rust-prod.mp3".to_string(),
                size: 2048,
            },
        )
    }

    #[test]
    fn test_row_path_with_and_without_dir() {
        assert_eq!(row("").path, PathBuf::from("/srv/podcasts/rust-prod.mp3"));
        assert_eq!(
            row("changelog/2024").path,
            PathBuf::from("/srv/podcasts/changelog/2024/rust-prod.mp3")
        );
    }

    #[test]
    fn test_row_path_stays_under_download_root() {
        let root = Path::new("/srv/podcasts");
        let cases = [
            ("", "/etc/passwd"),
            ("/tmp/abs", "../../home/x/.bashrc"),
            ("../..", "ep.mp3"),
            ("a/./b", "/"),
        ];
        for (dir, filename) in cases {
            let row = DownloadRow::new(
                root,
                DownloadItem {
                    title: String::new(),
                    item_title: String::new(),
                    dir: dir.to_string(),
                    filename: filename.to_string(),
                    url: String::new(),
                    size: 0,
                },
            );
            assert!(row.path.starts_with(root), "{dir:?} + {filename:?} -> {:?}", row.path);
        }
    }

    #[test]
    fn test_row_path_drops_traversal_components() {
        let row = DownloadRow::new(
            Path::new("/srv/podcasts"),
            DownloadItem {
                title: String::new(),
                item_title: String::new(),
                dir: "/tmp/abs".to_string(),
                filename: "../../home/x/.bashrc".to_string(),
                url: String::new(),
                size: 0,
            },
        );
        assert_eq!(row.path, PathBuf::from("/srv/podcasts/tmp/abs/home/x/.bashrc"));
    }

    #[test]
    fn test_downloads_table() {
        let table = format_downloads_table(&[row("")], false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#"));
        assert!(lines[1].starts_with("1    Rust in production"));
        assert!(lines[1].contains("2.0 KiB"));
        assert!(lines[1].ends_with("/srv/podcasts/rust-prod.mp3"));
    }

    #[test]
    fn test_downloads_table_empty() {
        assert_eq!(format_downloads_table(&[], true), "Nothing to download.\n");
    }

    #[test]
    fn test_downloads_json() {
        let json = format_downloads_json("changelog", &[row("x")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["podcast"], "changelog");
        assert_eq!(value["downloads"][0]["item_title"], "Rust in production");
        assert_eq!(value["downloads"][0]["size"], 2048);
        assert_eq!(value["downloads"][0]["path"], "/srv/podcasts/x/rust-prod.mp3");
    }
}
