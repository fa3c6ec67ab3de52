// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Revpick library - revision selection and grouping for release channels
//!
//! This crate computes which build revisions are release candidates for the
//! channel and architecture being browsed, which ones are already selected,
//! and which revisions on other architectures share a version or build and
//! should be offered alongside them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod commands;
pub mod config;
pub mod disclosure;
pub mod selection;
pub mod session;
pub mod siblings;
pub mod source;
pub mod view;

/// Core data types for revisions, filters and channels
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::collections::{BTreeMap, BTreeSet};
    use std::fmt;
    use std::str::FromStr;
    use thiserror::Error;

    // =========================================================================
    // Parse Errors
    // =========================================================================

    /// Errors raised when parsing filter components from text
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum ParseError {
        /// Risk name is not one of the known risks
        #[error("unknown risk: {0} (valid: available, stable, candidate, beta, edge)")]
        UnknownRisk(String),
        /// Available-revisions mode is not one of the known modes
        #[error("unknown mode: {0} (valid: all, unreleased, recent, launchpad)")]
        UnknownMode(String),
        /// Channel text is not `track/risk[/branch]`
        #[error("invalid channel: {0} (expected track/risk[/branch])")]
        InvalidChannel(String),
        /// Revision id is not an unsigned integer
        #[error("invalid revision id: {0}")]
        InvalidRevisionId(String),
    }

    // =========================================================================
    // Revision
    // =========================================================================

    /// Revision number assigned by the store
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct RevisionId(pub u64);

    impl fmt::Display for RevisionId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl FromStr for RevisionId {
        type Err = ParseError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            s.trim()
                .parse::<u64>()
                .map(Self)
                .map_err(|_| ParseError::InvalidRevisionId(s.to_string()))
        }
    }

    /// A single uploaded build revision
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Revision {
        /// Revision number (identity)
        #[serde(rename = "revision")]
        pub id: RevisionId,
        /// Version string declared by the build
        pub version: String,
        /// Build request that produced this revision, if built remotely
        #[serde(default, rename = "build_request_id")]
        pub build_id: Option<String>,
        /// Architectures this revision runs on (never empty)
        pub architectures: BTreeSet<String>,
        /// Built with devmode confinement or devel grade
        #[serde(default)]
        pub devmode: bool,
        /// Channels this revision is currently released to
        #[serde(default)]
        pub channels: BTreeMap<String, bool>,
        /// Upload time
        pub created_at: DateTime<Utc>,
    }

    impl Revision {
        /// Whether this revision runs on `arch`
        #[must_use]
        pub fn has_arch(&self, arch: &str) -> bool {
            self.architectures.contains(arch)
        }

        /// Whether this revision was never released to any channel
        #[must_use]
        pub fn is_unreleased(&self) -> bool {
            !self.channels.values().any(|released| *released)
        }

        /// Channels this revision is released to, in name order
        #[must_use]
        pub fn released_channels(&self) -> Vec<&str> {
            self.channels
                .iter()
                .filter(|(_, released)| **released)
                .map(|(name, _)| name.as_str())
                .collect()
        }
    }

    // =========================================================================
    // Channels and Filters
    // =========================================================================

    /// Channel risk level, plus the pseudo-risk for unreleased builds
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Risk {
        /// Not a channel: the pool of uploaded revisions
        Available,
        /// Stable channel
        Stable,
        /// Candidate channel
        Candidate,
        /// Beta channel
        Beta,
        /// Edge channel
        Edge,
    }

    impl Risk {
        /// Lowercase name as used in channel names
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::Available => "available",
                Self::Stable => "stable",
                Self::Candidate => "candidate",
                Self::Beta => "beta",
                Self::Edge => "edge",
            }
        }
    }

    impl fmt::Display for Risk {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for Risk {
        type Err = ParseError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_lowercase().as_str() {
                "available" => Ok(Self::Available),
                "stable" => Ok(Self::Stable),
                "candidate" => Ok(Self::Candidate),
                "beta" => Ok(Self::Beta),
                "edge" => Ok(Self::Edge),
                other => Err(ParseError::UnknownRisk(other.to_string())),
            }
        }
    }

    /// Which slice of available revisions is being browsed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum AvailableMode {
        /// Every uploaded revision
        #[default]
        All,
        /// Revisions never released to a channel
        Unreleased,
        /// Unreleased revisions uploaded within the recent window
        Recent,
        /// Revisions built from a Launchpad build request
        #[serde(rename = "launchpad")]
        LaunchpadBuilt,
    }

    impl AvailableMode {
        /// Tag used in grouping keys
        #[must_use]
        pub fn tag(&self) -> &'static str {
            match self {
                Self::All => "all",
                Self::Unreleased => "unreleased",
                Self::Recent => "recent",
                Self::LaunchpadBuilt => "launchpad",
            }
        }
    }

    impl fmt::Display for AvailableMode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.tag())
        }
    }

    impl FromStr for AvailableMode {
        type Err = ParseError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.to_lowercase().as_str() {
                "all" => Ok(Self::All),
                "unreleased" => Ok(Self::Unreleased),
                "recent" => Ok(Self::Recent),
                "launchpad" | "launchpad-built" => Ok(Self::LaunchpadBuilt),
                other => Err(ParseError::UnknownMode(other.to_string())),
            }
        }
    }

    /// Build a channel name from its parts
    #[must_use]
    pub fn channel_name(track: &str, risk: Risk, branch: Option<&str>) -> String {
        match branch {
            Some(b) => format!("{track}/{risk}/{b}"),
            None => format!("{track}/{risk}"),
        }
    }

    /// The track/risk/branch/architecture the user is browsing
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FilterContext {
        /// Track name (e.g. "latest")
        pub track: String,
        /// Risk, or `Available` for the revision pool
        pub risk: Risk,
        /// Optional branch
        #[serde(default)]
        pub branch: Option<String>,
        /// Architecture being browsed
        pub architecture: String,
    }

    impl FilterContext {
        /// Create a filter without a branch
        #[must_use]
        pub fn new(track: impl Into<String>, risk: Risk, architecture: impl Into<String>) -> Self {
            Self {
                track: track.into(),
                risk,
                branch: None,
                architecture: architecture.into(),
            }
        }

        /// Set the branch
        #[must_use]
        pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
            self.branch = Some(branch.into());
            self
        }

        /// Parse `track/risk[/branch]` plus an architecture
        pub fn parse(channel: &str, architecture: &str) -> Result<Self, ParseError> {
            let parts: Vec<&str> = channel.split('/').collect();
            let invalid = || ParseError::InvalidChannel(channel.to_string());
            let (track, risk, branch) = match parts.as_slice() {
                [track, risk] => (*track, *risk, None),
                [track, risk, branch] if !branch.is_empty() => (*track, *risk, Some(*branch)),
                _ => return Err(invalid()),
            };
            if track.is_empty() || architecture.trim().is_empty() {
                return Err(invalid());
            }
            Ok(Self {
                track: track.to_string(),
                risk: risk.parse()?,
                branch: branch.map(String::from),
                architecture: architecture.trim().to_string(),
            })
        }

        /// Whether this filter browses the available-revisions pool
        #[must_use]
        pub fn is_available(&self) -> bool {
            self.risk == Risk::Available
        }

        /// Channel name for this filter
        #[must_use]
        pub fn channel(&self) -> String {
            channel_name(&self.track, self.risk, self.branch.as_deref())
        }
    }

    // =========================================================================
    // Release History and Pending Releases
    // =========================================================================

    /// A past release of a revision into a channel for one architecture
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReleaseRecord {
        /// Released revision
        pub revision: RevisionId,
        /// Track released to
        pub track: String,
        /// Risk released to
        pub risk: Risk,
        /// Branch released to
        #[serde(default)]
        pub branch: Option<String>,
        /// Architecture released for
        pub architecture: String,
        /// Release time
        pub released_at: DateTime<Utc>,
    }

    impl ReleaseRecord {
        /// Whether this record belongs to the filter's channel and architecture
        #[must_use]
        pub fn matches(&self, filter: &FilterContext) -> bool {
            self.track == filter.track
                && self.risk == filter.risk
                && self.branch == filter.branch
                && self.architecture == filter.architecture
        }
    }

    /// Channel name -> architecture -> revision pending release there
    pub type PendingChannelMap = BTreeMap<String, BTreeMap<String, RevisionId>>;

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// On-disk snapshot of everything the engine reads
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CatalogStore {
        /// Revisions in load order
        #[serde(default)]
        pub revisions: Vec<Revision>,
        /// Release history records
        #[serde(default)]
        pub releases: Vec<ReleaseRecord>,
        /// Pending releases per channel and architecture
        #[serde(default)]
        pub pending: PendingChannelMap,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogError};
    pub use crate::disclosure::{DisclosureState, GroupingKey};
    pub use crate::selection::SelectionSet;
    pub use crate::session::{Session, SessionEvent};
    pub use crate::siblings::{SiblingGroup, SiblingKey};
    pub use crate::source::RevisionSource;
    pub use crate::types::*;
    pub use crate::view::{compute_view, ViewModel, ViewOptions, ViewRow};
    pub use anyhow::{Context, Result};
}
