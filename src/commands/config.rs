// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - prints the effective configuration

use crate::config::{self, Config};
use anyhow::{Context, Result};

/// Run the config command
pub fn run(config: &Config, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        println!("{text}");
    } else {
        print!("{}", config::to_toml(config)?);
    }
    Ok(())
}
