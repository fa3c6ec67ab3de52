// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Grouping engine: turns catalog + filter + selection into a view model
//!
//! [`compute_view`] is a pure function. It reads the revision source, the
//! caller's selection and disclosure state, and returns everything a front
//! end needs to draw the revisions list: rows (cut to one page unless
//! revealed), the pinned pending release, sibling groups to offer, and the
//! column/warning flags.

use crate::disclosure::{DisclosureState, GroupingKey};
use crate::selection::SelectionSet;
use crate::siblings::{build_siblings, version_siblings, SiblingGroup};
use crate::source::{RecentWindow, RevisionSource};
use crate::types::{AvailableMode, FilterContext, Revision, RevisionId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Rows shown before the list is revealed
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Days an unreleased upload counts as recent
pub const DEFAULT_RECENT_DAYS: i64 = 7;

/// Tunables for one view computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Rows kept when the list is collapsed
    pub page_size: usize,
    /// Length of the recent window in days
    pub recent_days: i64,
    /// Reference time for the recent window
    pub now: DateTime<Utc>,
}

impl ViewOptions {
    /// Default options evaluated at `now`
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            recent_days: DEFAULT_RECENT_DAYS,
            now,
        }
    }

    /// Override the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn recent_window(&self) -> RecentWindow {
        RecentWindow::days(self.now, self.recent_days)
    }
}

/// Which date the list's last column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateColumn {
    /// When the revision was released to the channel
    ReleaseDate,
    /// When the revision was uploaded
    SubmissionDate,
}

impl DateColumn {
    /// Column heading
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ReleaseDate => "Release date",
            Self::SubmissionDate => "Submission date",
        }
    }
}

/// One rendered revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    /// The revision itself
    pub revision: Revision,
    /// Row has a selection checkbox
    pub is_selectable: bool,
    /// Revision is in the selection
    pub is_selected: bool,
    /// Revision is what the channel will hold after release
    pub is_active: bool,
    /// Row is the pinned pending release
    pub is_pending: bool,
    /// When it was released, for release history rows
    pub released_at: Option<DateTime<Utc>>,
}

/// Everything needed to draw the revisions list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    /// Heading text
    pub title: String,
    /// Filter the view was computed for
    pub filter: Option<FilterContext>,
    /// Available-revisions mode in effect
    pub mode: AvailableMode,
    /// Disclosure key of this list
    pub grouping_key: GroupingKey,
    /// List is a channel's release history rather than candidates
    pub is_release_history: bool,
    /// Pending release shown above the list, never truncated
    pub pinned: Option<ViewRow>,
    /// Visible rows
    pub rows: Vec<ViewRow>,
    /// Entries in the full list
    pub total: usize,
    /// Entries cut by the page limit
    pub hidden: usize,
    /// List was revealed for this key
    pub expanded: bool,
    /// Revision sibling groups are derived from
    pub anchor: Option<Revision>,
    /// Same version on other architectures
    pub version_siblings: Option<SiblingGroup>,
    /// Same build on other architectures
    pub build_siblings: Option<SiblingGroup>,
    /// Some listed revision is in devmode
    pub has_devmode: bool,
    /// Show the channels column
    pub show_channels: bool,
    /// Show the build request column
    pub show_build_request: bool,
    /// Meaning of the date column
    pub date_column: DateColumn,
    /// Revision pending for the filter's channel and architecture
    pub active_revision: Option<RevisionId>,
}

impl ViewModel {
    /// "Show all" link text while entries are hidden
    #[must_use]
    pub fn show_all_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("Show all {} revisions", self.total))
    }

    /// Sibling group to offer for the current mode, if any
    #[must_use]
    pub fn banner(&self) -> Option<&SiblingGroup> {
        self.version_siblings
            .as_ref()
            .or(self.build_siblings.as_ref())
    }

    /// Whether there is nothing to list
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0 && self.pinned.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listing {
    Latest,
    Available,
    History,
}

fn available_title(mode: AvailableMode, arch: &str) -> String {
    match mode {
        AvailableMode::All => format!("Latest revisions for {arch}"),
        AvailableMode::Unreleased => format!("Unreleased revisions for {arch}"),
        AvailableMode::Recent => format!("Recent unreleased revisions for {arch}"),
        AvailableMode::LaunchpadBuilt => format!("Revisions built on Launchpad for {arch}"),
    }
}

/// Anchor for sibling lookups: the most recently selected revision on
/// `arch`, else the newest one, first in list order on ties
fn resolve_anchor<'a>(
    list: &[&'a Revision],
    selection: &SelectionSet,
    arch: &str,
) -> Option<&'a Revision> {
    if let Some(selected) = selection.latest_for_arch(list, arch) {
        return Some(selected);
    }
    let mut newest: Option<&'a Revision> = None;
    for revision in list.iter().copied().filter(|r| r.has_arch(arch)) {
        if newest.map_or(true, |n| revision.created_at > n.created_at) {
            newest = Some(revision);
        }
    }
    newest
}

/// Compute the revisions list for the current filter
pub fn compute_view<S>(
    source: &S,
    filter: Option<&FilterContext>,
    selection: &SelectionSet,
    mode: AvailableMode,
    disclosure: &DisclosureState,
    options: &ViewOptions,
) -> ViewModel
where
    S: RevisionSource + ?Sized,
{
    let window = options.recent_window();
    let available = source.filtered_available_revisions(mode, &window);

    let mut release_dates: Vec<DateTime<Utc>> = Vec::new();
    let (listing, list, title) = match filter {
        None => (Listing::Latest, available.clone(), "Latest revisions".to_string()),
        Some(f) if f.is_available() => (
            Listing::Available,
            source.filtered_available_revisions_for_arch(mode, &window, &f.architecture),
            available_title(mode, &f.architecture),
        ),
        Some(f) => {
            let mut history = Vec::new();
            for record in source.filtered_release_records(f) {
                if let Some(revision) = source.revision(record.revision) {
                    history.push(revision);
                    release_dates.push(record.released_at);
                }
            }
            (
                Listing::History,
                history,
                format!("Releases history for {} in {}", f.architecture, f.channel()),
            )
        }
    };

    let anchor = filter.and_then(|f| resolve_anchor(&list, selection, &f.architecture));

    let (version_group, build_group) = match (listing, filter, anchor) {
        (Listing::Available, Some(f), Some(anchor)) => {
            if mode == AvailableMode::LaunchpadBuilt {
                (
                    None,
                    build_siblings(&available, anchor, &f.architecture, selection),
                )
            } else {
                (
                    version_siblings(&available, anchor, &f.architecture, selection),
                    None,
                )
            }
        }
        _ => (None, None),
    };

    let active_revision = filter.and_then(|f| {
        source
            .pending_channel_map()
            .get(&f.channel())
            .and_then(|archs| archs.get(&f.architecture))
            .copied()
    });

    let is_release_history = listing == Listing::History;
    let make_row = |revision: &Revision, is_pending: bool, released_at| ViewRow {
        revision: revision.clone(),
        is_selectable: !is_release_history,
        is_selected: selection.contains(revision.id),
        is_active: active_revision == Some(revision.id),
        is_pending,
        released_at,
    };

    let pinned = match (listing, filter) {
        (Listing::History, Some(f)) => source
            .pending_release(&f.channel(), &f.architecture)
            .map(|r| make_row(r, true, None)),
        _ => None,
    };

    let grouping_key = GroupingKey::new(filter, mode);
    let expanded = disclosure.is_expanded(&grouping_key);
    let total = list.len();
    let shown = if expanded {
        total
    } else {
        total.min(options.page_size)
    };
    let rows: Vec<ViewRow> = list[..shown]
        .iter()
        .enumerate()
        .map(|(pos, r)| make_row(*r, false, release_dates.get(pos).copied()))
        .collect();

    debug!(
        key = %grouping_key,
        total,
        hidden = total - shown,
        version_siblings = version_group.as_ref().map_or(0, |g| g.members.len()),
        build_siblings = build_group.as_ref().map_or(0, |g| g.members.len()),
        "Computed revisions view"
    );

    ViewModel {
        title,
        filter: filter.cloned(),
        mode,
        grouping_key,
        is_release_history,
        pinned,
        rows,
        total,
        hidden: total - shown,
        expanded,
        anchor: anchor.cloned(),
        version_siblings: version_group,
        build_siblings: build_group,
        has_devmode: list.iter().any(|r| r.devmode),
        show_channels: filter
            .map_or(true, |f| f.is_available() && mode == AvailableMode::All),
        show_build_request: source.has_build_request_id(),
        date_column: if is_release_history {
            DateColumn::ReleaseDate
        } else {
            DateColumn::SubmissionDate
        },
        active_revision,
    }
}
