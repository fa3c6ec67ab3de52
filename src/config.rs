// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management

use crate::view::{DEFAULT_PAGE_SIZE, DEFAULT_RECENT_DAYS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Longest accepted recent window, in days
pub const MAX_RECENT_WINDOW_DAYS: i64 = 36_500;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog snapshot to load
    pub catalog: PathBuf,
    /// Rows shown before a list is revealed
    pub page_size: usize,
    /// Days an unreleased upload counts as recent
    pub recent_window_days: i64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "hyperpolymath", "revpick")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: project_dirs()
                .map(|d| d.data_dir().join("catalog.json"))
                .unwrap_or_else(|| PathBuf::from("~/.local/share/revpick/catalog.json")),
            page_size: DEFAULT_PAGE_SIZE,
            recent_window_days: DEFAULT_RECENT_DAYS,
            log_level: "info".to_string(),
        }
    }
}

/// Default location of the config file
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from `path`, the default location, or defaults
///
/// An explicit path must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let candidate = match path {
        Some(p) => p.to_path_buf(),
        None => match default_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    let content = fs::read_to_string(&candidate)
        .with_context(|| format!("Failed to read {}", candidate.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", candidate.display()))
}

/// Parse configuration from TOML text
pub fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    if config.page_size == 0 {
        anyhow::bail!("page_size must be at least 1");
    }
    if !(0..=MAX_RECENT_WINDOW_DAYS).contains(&config.recent_window_days) {
        anyhow::bail!(
            "recent_window_days must be between 0 and {MAX_RECENT_WINDOW_DAYS}, got {}",
            config.recent_window_days
        );
    }
    config.level()?;
    Ok(config)
}

impl Config {
    /// Parsed `log_level`
    pub fn level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log_level {:?}", self.log_level))
    }
}

/// Render configuration as TOML
pub fn to_toml(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration")
}
