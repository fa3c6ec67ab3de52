// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Read-only queries the grouping engine makes against a revision store
//!
//! [`RevisionSource`] is the seam between the engine and whatever holds the
//! revisions. Implementors supply the raw collections; the filtered views are
//! provided methods so every source filters the same way.

use crate::types::{
    AvailableMode, FilterContext, PendingChannelMap, ReleaseRecord, Revision, RevisionId,
};
use chrono::{DateTime, Duration, Utc};

/// Time window used by [`AvailableMode::Recent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentWindow {
    /// Reference point, normally the current time
    pub now: DateTime<Utc>,
    /// How far back counts as recent; `None` reaches back without limit
    pub span: Option<Duration>,
}

impl RecentWindow {
    /// Window of `days` days ending at `now`
    ///
    /// A length chrono can't represent leaves the window unbounded.
    #[must_use]
    pub fn days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            now,
            span: Duration::try_days(days),
        }
    }

    /// Whether `at` falls inside the window
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match self.span.and_then(|span| self.now.checked_sub_signed(span)) {
            Some(start) => at >= start,
            None => true,
        }
    }
}

fn admits_all(_revision: &Revision, _window: &RecentWindow) -> bool {
    true
}

fn admits_unreleased(revision: &Revision, _window: &RecentWindow) -> bool {
    revision.is_unreleased()
}

fn admits_recent(revision: &Revision, window: &RecentWindow) -> bool {
    revision.is_unreleased() && window.contains(revision.created_at)
}

fn admits_launchpad_built(revision: &Revision, _window: &RecentWindow) -> bool {
    revision.build_id.is_some()
}

impl AvailableMode {
    /// Predicate selecting the revisions shown in this mode
    #[must_use]
    pub fn predicate(&self) -> fn(&Revision, &RecentWindow) -> bool {
        match self {
            Self::All => admits_all,
            Self::Unreleased => admits_unreleased,
            Self::Recent => admits_recent,
            Self::LaunchpadBuilt => admits_launchpad_built,
        }
    }
}

/// Store-side queries consumed by the grouping engine
///
/// Revisions are returned in catalog order. That order is part of the
/// contract: sibling dedup and anchor tie-breaks depend on it.
pub trait RevisionSource {
    /// All revisions in catalog order
    fn revisions(&self) -> &[Revision];

    /// Look up a revision by id
    fn revision(&self, id: RevisionId) -> Option<&Revision>;

    /// Release history records in load order
    fn releases(&self) -> &[ReleaseRecord];

    /// Pending release per channel and architecture
    fn pending_channel_map(&self) -> &PendingChannelMap;

    /// Revisions admitted by `mode`, across all architectures
    fn filtered_available_revisions(
        &self,
        mode: AvailableMode,
        window: &RecentWindow,
    ) -> Vec<&Revision> {
        let admits = mode.predicate();
        self.revisions()
            .iter()
            .filter(|r| admits(r, window))
            .collect()
    }

    /// Revisions admitted by `mode` that run on `arch`
    fn filtered_available_revisions_for_arch(
        &self,
        mode: AvailableMode,
        window: &RecentWindow,
        arch: &str,
    ) -> Vec<&Revision> {
        let admits = mode.predicate();
        self.revisions()
            .iter()
            .filter(|r| r.has_arch(arch) && admits(r, window))
            .collect()
    }

    /// Release records for the filter's channel and architecture, most
    /// recent release first
    fn filtered_release_records(&self, filter: &FilterContext) -> Vec<&ReleaseRecord> {
        let mut records: Vec<&ReleaseRecord> = self
            .releases()
            .iter()
            .filter(|record| record.matches(filter))
            .collect();
        // stable: equal timestamps keep load order
        records.sort_by(|a, b| b.released_at.cmp(&a.released_at));
        records
    }

    /// Revisions released into the filter's channel for its architecture,
    /// most recent release first
    fn filtered_release_history(&self, filter: &FilterContext) -> Vec<&Revision> {
        self.filtered_release_records(filter)
            .into_iter()
            .filter_map(|record| self.revision(record.revision))
            .collect()
    }

    /// Revision pending release in `channel` for `arch`
    fn pending_release(&self, channel: &str, arch: &str) -> Option<&Revision> {
        self.pending_channel_map()
            .get(channel)
            .and_then(|archs| archs.get(arch))
            .and_then(|id| self.revision(*id))
    }

    /// Whether any revision carries a build request id
    fn has_build_request_id(&self) -> bool {
        self.revisions().iter().any(|r| r.build_id.is_some())
    }
}
