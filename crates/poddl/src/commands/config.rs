//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/poddl/config.toml.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::BaseDirs;
use log::debug;
use poddl_filter::selection::DEFAULT_DATE_FORMAT;
use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Maximum Levenshtein distance for "did you mean" podcast suggestions.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Download root used when neither the defaults nor the podcast set one.
const DEFAULT_DOWNLOAD_PATH: &str = "~/Podcasts";

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# poddl - podcast downloader configuration

# Config schema version (do not modify)
version = 1

# Settings shared by every podcast. Each key can be overridden per podcast.
[defaults]
download_path = "~/Podcasts"
# separate_dir = "{{Name}}/{{ItemPubDate}}"   # sub-directory template
# disabled = false
# date_format = "%Y%m%d"                      # strftime pattern for date placeholders
# filter = "'Trailer' not in {{ItemTitle}}"   # download condition
media_types = ["audio"]

# [podcasts.changelog]
# url = "https://changelog.com/podcast/feed"
# last_synced = "2024-01-01T00:00:00Z"
# filter = "'News' in prefix {{ItemTitle}}"
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Settings applied to every podcast.
    #[serde(default)]
    pub defaults: PodcastSettings,

    /// Configured podcasts keyed by name.
    #[serde(default)]
    pub podcasts: BTreeMap<String, PodcastEntry>,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            defaults: PodcastSettings::default(),
            podcasts: BTreeMap::new(),
        }
    }
}

/// Overridable podcast settings. Unset keys fall back to `[defaults]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub separate_dir: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_types: Option<Vec<String>>,
}

impl PodcastSettings {
    /// Returns these settings with every key set in `overrides` replaced.
    pub fn overlay(&self, overrides: &PodcastSettings) -> PodcastSettings {
        PodcastSettings {
            download_path: overrides
                .download_path
                .clone()
                .or_else(|| self.download_path.clone()),
            separate_dir: overrides
                .separate_dir
                .clone()
                .or_else(|| self.separate_dir.clone()),
            disabled: overrides.disabled.or(self.disabled),
            date_format: overrides
                .date_format
                .clone()
                .or_else(|| self.date_format.clone()),
            filter: overrides.filter.clone().or_else(|| self.filter.clone()),
            media_types: overrides
                .media_types
                .clone()
                .or_else(|| self.media_types.clone()),
        }
    }
}

/// A `[podcasts.NAME]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastEntry {
    /// Feed URL.
    pub url: String,

    /// Time of the last successful sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced: Option<DateTime<Utc>>,

    /// Per-podcast overrides.
    #[serde(flatten)]
    pub settings: PodcastSettings,
}

/// Fully resolved settings for one podcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectivePodcast {
    pub name: String,
    pub url: String,
    pub last_synced: Option<DateTime<Utc>>,
    pub download_path: PathBuf,
    pub separate_dir: String,
    pub disabled: bool,
    pub date_format: String,
    pub filter: String,
    pub media_types: Vec<String>,
}

impl Config {
    /// Resolves a podcast by name or 1-based index in name order.
    pub fn find_podcast(&self, key: &str) -> Result<(&str, &PodcastEntry)> {
        if let Some((name, entry)) = self.podcasts.get_key_value(key) {
            return Ok((name.as_str(), entry));
        }

        if let Ok(index) = key.parse::<usize>() {
            if let Some((name, entry)) = index
                .checked_sub(1)
                .and_then(|i| self.podcasts.iter().nth(i))
            {
                return Ok((name.as_str(), entry));
            }
        }

        Err(CommandError::PodcastNotFound {
            name: key.to_string(),
            suggestion: find_similar_name(key, self.podcasts.keys().map(String::as_str)),
        })
    }

    /// Adds a podcast with no sync history.
    pub fn add_podcast(&mut self, name: &str, url: &str) -> Result<()> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() {
            return Err(CommandError::InvalidArgument(
                "podcast name cannot be empty".to_string(),
            ));
        }
        if url.is_empty() {
            return Err(CommandError::InvalidArgument(
                "podcast url cannot be empty".to_string(),
            ));
        }
        if self.podcasts.contains_key(name) {
            return Err(CommandError::Config(format!(
                "Podcast '{}' already exists",
                name
            )));
        }

        self.podcasts.insert(
            name.to_string(),
            PodcastEntry {
                url: url.to_string(),
                ..Default::default()
            },
        );
        Ok(())
    }

    /// Removes a podcast by name or 1-based index and returns its name.
    pub fn remove_podcast(&mut self, key: &str) -> Result<String> {
        let name = self.find_podcast(key)?.0.to_string();
        self.podcasts.remove(&name);
        Ok(name)
    }

    /// Clears `last_synced` for one podcast, or for all when `key` is `None`.
    /// Returns the names that were reset.
    pub fn reset_sync(&mut self, key: Option<&str>) -> Result<Vec<String>> {
        let names: Vec<String> = match key {
            Some(key) => vec![self.find_podcast(key)?.0.to_string()],
            None => self.podcasts.keys().cloned().collect(),
        };

        for name in &names {
            if let Some(entry) = self.podcasts.get_mut(name) {
                entry.last_synced = None;
            }
        }
        Ok(names)
    }

    /// Overlays the podcast's keys on `[defaults]`.
    pub fn effective(&self, name: &str, entry: &PodcastEntry) -> EffectivePodcast {
        let merged = self.defaults.overlay(&entry.settings);
        EffectivePodcast {
            name: name.to_string(),
            url: entry.url.clone(),
            last_synced: entry.last_synced,
            download_path: expand_home(
                merged
                    .download_path
                    .as_deref()
                    .unwrap_or(DEFAULT_DOWNLOAD_PATH),
            ),
            separate_dir: merged.separate_dir.unwrap_or_default(),
            disabled: merged.disabled.unwrap_or(false),
            date_format: merged
                .date_format
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            filter: merged.filter.unwrap_or_default(),
            media_types: merged.media_types.unwrap_or_default(),
        }
    }
}

/// Finds the closest configured name for a "did you mean" hint.
fn find_similar_name<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| {
            let distance = levenshtein(&query_lower, &name.to_lowercase());
            (name.to_string(), distance)
        })
        .min_by_key(|(_, d)| *d)?;

    // Only suggest if the distance is within threshold and not an exact match
    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match)
    } else {
        None
    }
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };

    match BaseDirs::new() {
        Some(dirs) if rest.is_empty() => dirs.home_dir().to_path_buf(),
        Some(dirs) => dirs.home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// Gets the config file path.
///
/// An explicit path (from `--config` or `PODDL_CONFIG`) wins, then
/// `$XDG_CONFIG_HOME/poddl`, then `~/.config/poddl`.
pub fn get_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        if !xdg_config.is_empty() {
            return Ok(PathBuf::from(xdg_config).join("poddl").join("config.toml"));
        }
    }

    BaseDirs::new()
        .map(|dirs| {
            dirs.home_dir()
                .join(".config")
                .join("poddl")
                .join("config.toml")
        })
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk.
///
/// A missing file yields the default configuration.
pub fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let path = get_config_path(override_path)?;

    if !path.exists() {
        debug!("no config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
///
/// Comments in a hand-edited file are not preserved.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    debug!("saved config to {}", path.display());
    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let config = load_config(Some(path.as_path()))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("[defaults]");
            print_settings(&config.defaults);

            for (name, entry) in &config.podcasts {
                println!("\n[podcasts.{}]", name);
                println!("  url: {}", entry.url);
                if let Some(synced) = entry.last_synced {
                    println!("  last_synced: {}", synced.to_rfc3339());
                }
                print_settings(&entry.settings);
            }
        } else {
            println!("(No config file exists. Run 'poddl config init' to create one.)");
        }
    }

    Ok(())
}

fn print_settings(settings: &PodcastSettings) {
    if let Some(ref path) = settings.download_path {
        println!("  download_path: {}", path);
    }
    if let Some(ref dir) = settings.separate_dir {
        println!("  separate_dir: {}", dir);
    }
    if let Some(disabled) = settings.disabled {
        println!("  disabled: {}", disabled);
    }
    if let Some(ref format) = settings.date_format {
        println!("  date_format: {}", format);
    }
    if let Some(ref filter) = settings.filter {
        println!("  filter: {}", filter);
    }
    if let Some(ref types) = settings.media_types {
        println!("  media_types: {}", types.join(", "));
    }
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created default config at: {}", path.display());
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the add command.
pub fn execute_add(ctx: &CommandContext, url: &str, name: &str) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let mut config = load_config(Some(path.as_path()))?;
    config.add_podcast(name, url)?;
    save_config(&path, &config)?;

    let name = name.trim();
    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "added": name,
            "url": url.trim(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Podcast [{}] added", name);
    }

    Ok(())
}

/// Executes the remove command.
pub fn execute_remove(ctx: &CommandContext, podcast: &str) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let mut config = load_config(Some(path.as_path()))?;
    let name = config.remove_podcast(podcast)?;
    save_config(&path, &config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "removed": name,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Podcast [{}] removed", name);
    }

    Ok(())
}

/// Executes the reset command.
pub fn execute_reset(ctx: &CommandContext, podcast: Option<&str>) -> Result<()> {
    let path = get_config_path(ctx.config_path.as_deref())?;
    let mut config = load_config(Some(path.as_path()))?;
    let names = config.reset_sync(podcast)?;
    save_config(&path, &config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "reset": names,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if names.is_empty() {
            println!("No podcasts configured.");
        }
        for name in &names {
            println!("Podcast [{}] will sync from the beginning", name);
        }
    }

    Ok(())
}
