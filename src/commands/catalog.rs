// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Catalog command - summarizes the loaded snapshot

use super::Globals;
use crate::catalog::Catalog;
use crate::source::RevisionSource;
use anyhow::{Context, Result};
use serde::Serialize;

/// What the catalog holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    /// Number of revisions
    pub revisions: usize,
    /// Revisions never released to a channel
    pub unreleased: usize,
    /// Revisions carrying a build request id
    pub launchpad_built: usize,
    /// Revisions in devmode
    pub devmode: usize,
    /// Architectures, sorted
    pub architectures: Vec<String>,
    /// Versions in order of first appearance
    pub versions: Vec<String>,
    /// Release history records
    pub releases: usize,
    /// Pending (channel, architecture) slots
    pub pending: usize,
}

impl CatalogSummary {
    /// Summarize `catalog`
    #[must_use]
    pub fn of(catalog: &Catalog) -> Self {
        let revisions = catalog.revisions();
        Self {
            revisions: revisions.len(),
            unreleased: revisions.iter().filter(|r| r.is_unreleased()).count(),
            launchpad_built: revisions.iter().filter(|r| r.build_id.is_some()).count(),
            devmode: revisions.iter().filter(|r| r.devmode).count(),
            architectures: catalog.architectures().into_iter().map(String::from).collect(),
            versions: catalog.versions().into_iter().map(String::from).collect(),
            releases: catalog.releases().len(),
            pending: catalog.pending_channel_map().values().map(|a| a.len()).sum(),
        }
    }
}

/// Run the catalog command
pub fn run(globals: &Globals) -> Result<()> {
    let catalog = globals.load_catalog()?;
    let summary = CatalogSummary::of(&catalog);

    if globals.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{json}");
        return Ok(());
    }

    println!("Catalog: {}", globals.catalog.display());
    println!("  revisions:       {}", summary.revisions);
    println!("  unreleased:      {}", summary.unreleased);
    println!("  launchpad built: {}", summary.launchpad_built);
    println!("  devmode:         {}", summary.devmode);
    println!("  architectures:   {}", summary.architectures.join(", "));
    println!("  versions:        {}", summary.versions.join(", "));
    println!("  releases:        {}", summary.releases);
    println!("  pending:         {}", summary.pending);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CatalogStore, Revision, RevisionId};
    use chrono::{TimeZone, Utc};

    fn rev(id: u64, version: &str, archs: &[&str]) -> Revision {
        Revision {
            id: RevisionId(id),
            version: version.into(),
            build_id: None,
            architectures: archs.iter().map(|a| (*a).to_string()).collect(),
            devmode: false,
            channels: Default::default(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut released = rev(3, "2.0", &["amd64"]);
        released.channels.insert("latest/stable".into(), true);
        let mut built = rev(2, "1.0", &["arm64", "armhf"]);
        built.build_id = Some("lp-1".into());
        built.devmode = true;

        let mut pending = crate::types::PendingChannelMap::new();
        pending
            .entry("latest/stable".into())
            .or_default()
            .insert("amd64".into(), RevisionId(3));

        let catalog = Catalog::from_store(CatalogStore {
            revisions: vec![released, built, rev(1, "2.0", &["amd64"])],
            releases: Vec::new(),
            pending,
        })
        .unwrap();

        let summary = CatalogSummary::of(&catalog);
        assert_eq!(summary.revisions, 3);
        assert_eq!(summary.unreleased, 2);
        assert_eq!(summary.launchpad_built, 1);
        assert_eq!(summary.devmode, 1);
        assert_eq!(summary.architectures, vec!["amd64", "arm64", "armhf"]);
        assert_eq!(summary.versions, vec!["2.0", "1.0"]);
        assert_eq!(summary.pending, 1);
    }
}
