// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod catalog;
pub mod completions;
pub mod config;
pub mod session;
pub mod view;

use crate::catalog::Catalog;
use crate::session::Session;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Settings shared by every command, resolved from flags and config
#[derive(Debug, Clone)]
pub struct Globals {
    /// Catalog snapshot path
    pub catalog: PathBuf,
    /// Emit JSON instead of text
    pub json: bool,
    /// Use ANSI colors in text output
    pub color: bool,
    /// Rows shown before a list is revealed
    pub page_size: usize,
    /// Days an unreleased upload counts as recent
    pub recent_days: i64,
}

impl Globals {
    /// Load the catalog snapshot
    pub fn load_catalog(&self) -> Result<Catalog> {
        Catalog::load(&self.catalog)
            .with_context(|| format!("Failed to load catalog from {}", self.catalog.display()))
    }

    /// Start a session over the catalog snapshot
    pub fn open_session(&self) -> Result<Session> {
        let catalog = self.load_catalog()?;
        Ok(Session::new(catalog).with_limits(self.page_size, self.recent_days))
    }
}
