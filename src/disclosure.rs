// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Per-view "show all" state

use crate::types::{AvailableMode, FilterContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifies one revisions list for disclosure purposes
///
/// `track/risk/arch`, with the mode tag appended for the available pool so
/// each available sub-view keeps its own state. The unfiltered list uses `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupingKey(String);

impl GroupingKey {
    /// Key of the unfiltered "latest revisions" list
    pub const UNFILTERED: &'static str = "*";

    /// Key for a filter (or its absence) and available-revisions mode
    #[must_use]
    pub fn new(filter: Option<&FilterContext>, mode: AvailableMode) -> Self {
        let Some(filter) = filter else {
            return Self(Self::UNFILTERED.to_string());
        };
        let mut key = format!("{}/{}/{}", filter.track, filter.risk, filter.architecture);
        if filter.is_available() {
            key.push('/');
            key.push_str(mode.tag());
        }
        Self(key)
    }

    /// Key text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupingKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which lists have been expanded past the first page
///
/// Owned by the caller and handed to the engine on each computation. Keys
/// that were never revealed read as collapsed. Nothing resets automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisclosureState {
    expanded: HashMap<GroupingKey, bool>,
}

impl DisclosureState {
    /// Create a state with every list collapsed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the list for `key` shows every entry
    #[must_use]
    pub fn is_expanded(&self, key: &GroupingKey) -> bool {
        self.expanded.get(key).copied().unwrap_or(false)
    }

    /// Expand the list for `key`; returns whether anything changed
    pub fn reveal(&mut self, key: GroupingKey) -> bool {
        !self.expanded.insert(key, true).unwrap_or(false)
    }

    /// Consume the state and return it with `key` expanded
    #[must_use]
    pub fn revealed(mut self, key: GroupingKey) -> Self {
        self.reveal(key);
        self
    }
}
