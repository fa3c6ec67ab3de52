// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! End-to-end scenarios for the revisions view

use chrono::{DateTime, Duration, TimeZone, Utc};
use revpick::prelude::*;
use revpick::session::SiblingKind;
use revpick::view::DateColumn;
use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// Test Helpers
// =============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap()
}

fn revision(id: u64, version: &str, archs: &[&str]) -> Revision {
    Revision {
        id: RevisionId(id),
        version: version.into(),
        build_id: None,
        architectures: archs.iter().map(|a| (*a).to_string()).collect(),
        devmode: false,
        channels: Default::default(),
        created_at: now() - Duration::hours(id as i64),
    }
}

fn release(id: u64, risk: Risk, arch: &str, hours_ago: i64) -> ReleaseRecord {
    ReleaseRecord {
        revision: RevisionId(id),
        track: "latest".into(),
        risk,
        branch: None,
        architecture: arch.into(),
        released_at: now() - Duration::hours(hours_ago),
    }
}

fn catalog(store: CatalogStore) -> Catalog {
    Catalog::from_store(store).unwrap()
}

fn only_revisions(revisions: Vec<Revision>) -> Catalog {
    catalog(CatalogStore {
        revisions,
        ..CatalogStore::default()
    })
}

fn amd64_available() -> FilterContext {
    FilterContext::new("latest", Risk::Available, "amd64")
}

fn ids(rows: &[ViewRow]) -> Vec<u64> {
    rows.iter().map(|r| r.revision.id.0).collect()
}

// =============================================================================
// Sibling Groups
// =============================================================================

#[test]
fn test_single_version_sibling_on_other_arch() {
    let catalog = only_revisions(vec![
        revision(1, "1.0", &["amd64"]),
        revision(2, "1.0", &["arm64"]),
    ]);
    let filter = amd64_available();

    let model = compute_view(
        &catalog,
        Some(&filter),
        &SelectionSet::new(),
        AvailableMode::All,
        &DisclosureState::new(),
        &ViewOptions::at(now()),
    );

    assert_eq!(model.anchor.as_ref().map(|r| r.id), Some(RevisionId(1)));
    let group = model.version_siblings.expect("version siblings");
    assert_eq!(group.member_ids(), vec![RevisionId(2)]);
    assert_eq!(
        group.covered_architectures.iter().collect::<Vec<_>>(),
        vec!["arm64"]
    );
    assert!(model.build_siblings.is_none());
}

#[test]
fn test_launchpad_mode_groups_by_build() {
    let mut a = revision(1, "1.0", &["amd64"]);
    a.build_id = Some("lp-1".into());
    let mut b = revision(2, "1.0", &["arm64"]);
    b.build_id = Some("lp-1".into());
    let mut c = revision(3, "1.0", &["s390x"]);
    c.build_id = Some("lp-2".into());
    let unbuilt = revision(4, "1.0", &["armhf"]);
    let catalog = only_revisions(vec![a, b, c, unbuilt]);
    let filter = amd64_available();

    let model = compute_view(
        &catalog,
        Some(&filter),
        &SelectionSet::new(),
        AvailableMode::LaunchpadBuilt,
        &DisclosureState::new(),
        &ViewOptions::at(now()),
    );

    assert!(model.version_siblings.is_none());
    let group = model.build_siblings.expect("build siblings");
    assert_eq!(group.member_ids(), vec![RevisionId(2)]);
    assert_eq!(group.key, SiblingKey::Build("lp-1".into()));
    assert!(model.show_build_request);
    assert!(!model.show_channels);
}

#[test]
fn test_unreleased_mode_skips_released_siblings() {
    let anchor = revision(1, "1.0", &["amd64"]);
    let mut released = revision(2, "1.0", &["arm64"]);
    released.channels.insert("latest/stable".into(), true);
    let fresh = revision(3, "1.0", &["s390x"]);
    let catalog = only_revisions(vec![anchor, released, fresh]);
    let filter = amd64_available();

    let model = compute_view(
        &catalog,
        Some(&filter),
        &SelectionSet::new(),
        AvailableMode::Unreleased,
        &DisclosureState::new(),
        &ViewOptions::at(now()),
    );

    let group = model.version_siblings.expect("version siblings");
    assert_eq!(group.member_ids(), vec![RevisionId(3)]);
}

// =============================================================================
// Truncation and Disclosure
// =============================================================================

#[test]
fn test_fifteen_revisions_truncate_until_revealed() {
    let catalog = only_revisions((1..=15).map(|i| revision(i, "1.0", &["amd64"])).collect());
    let filter = amd64_available();
    let key = GroupingKey::new(Some(&filter), AvailableMode::All);
    assert_eq!(key.as_str(), "latest/available/amd64/all");

    let run = |disclosure: &DisclosureState| {
        compute_view(
            &catalog,
            Some(&filter),
            &SelectionSet::new(),
            AvailableMode::All,
            disclosure,
            &ViewOptions::at(now()),
        )
    };

    let collapsed = run(&DisclosureState::new());
    assert_eq!(collapsed.rows.len(), 10);
    assert_eq!(collapsed.hidden, 5);
    assert_eq!(collapsed.total, 15);
    assert!(!collapsed.expanded);
    assert_eq!(
        collapsed.show_all_label().as_deref(),
        Some("Show all 15 revisions")
    );

    let revealed = run(&DisclosureState::new().revealed(key));
    assert_eq!(revealed.rows.len(), 15);
    assert_eq!(revealed.hidden, 0);
    assert!(revealed.expanded);
    assert!(revealed.show_all_label().is_none());
}

#[test]
fn test_reveal_is_per_grouping_key() {
    let catalog = only_revisions((1..=12).map(|i| revision(i, "1.0", &["amd64"])).collect());
    let filter = amd64_available();
    let disclosure =
        DisclosureState::new().revealed(GroupingKey::new(Some(&filter), AvailableMode::All));

    let other_mode = compute_view(
        &catalog,
        Some(&filter),
        &SelectionSet::new(),
        AvailableMode::Unreleased,
        &disclosure,
        &ViewOptions::at(now()),
    );
    assert_eq!(other_mode.rows.len(), 10);
    assert_eq!(other_mode.hidden, 2);
}

// =============================================================================
// Release History
// =============================================================================

fn history_catalog() -> Catalog {
    let revisions: Vec<Revision> = (1..=14)
        .map(|i| revision(i, "1.0", &["amd64", "arm64"]))
        .collect();
    let releases = (1..=14)
        .map(|i| release(i, Risk::Stable, "amd64", 100 - i as i64))
        .chain([release(1, Risk::Edge, "amd64", 1), release(2, Risk::Stable, "arm64", 1)])
        .collect();
    let mut pending = PendingChannelMap::new();
    pending
        .entry("latest/stable".into())
        .or_default()
        .insert("amd64".into(), RevisionId(1));
    catalog(CatalogStore {
        revisions,
        releases,
        pending,
    })
}

#[test]
fn test_pending_release_pinned_above_truncated_history() {
    let catalog = history_catalog();
    let filter = FilterContext::new("latest", Risk::Stable, "amd64");

    let model = compute_view(
        &catalog,
        Some(&filter),
        &SelectionSet::new(),
        AvailableMode::All,
        &DisclosureState::new(),
        &ViewOptions::at(now()),
    );

    assert_eq!(model.title, "Releases history for amd64 in latest/stable");
    assert_eq!(model.total, 14);
    assert_eq!(model.rows.len(), 10);
    assert_eq!(model.hidden, 4);
    // newest release first
    assert_eq!(ids(&model.rows), vec![14, 13, 12, 11, 10, 9, 8, 7, 6, 5]);

    let pinned = model.pinned.expect("pending row");
    assert_eq!(pinned.revision.id, RevisionId(1));
    assert!(pinned.is_pending);
    assert!(pinned.is_active);
    assert_eq!(model.active_revision, Some(RevisionId(1)));
}

#[test]
fn test_history_never_groups_or_selects() {
    let catalog = history_catalog();
    let filter = FilterContext::new("latest", Risk::Stable, "amd64");
    let selection: SelectionSet = [RevisionId(14), RevisionId(3)].into_iter().collect();

    let model = compute_view(
        &catalog,
        Some(&filter),
        &selection,
        AvailableMode::All,
        &DisclosureState::new(),
        &ViewOptions::at(now()),
    );

    assert!(model.is_release_history);
    assert!(model.version_siblings.is_none());
    assert!(model.build_siblings.is_none());
    assert!(model.banner().is_none());
    assert!(!model.show_channels);
    assert_eq!(model.date_column, DateColumn::ReleaseDate);
    assert!(model.rows.iter().all(|r| !r.is_selectable));
    assert!(model.rows.iter().all(|r| r.released_at.is_some()));
    assert_eq!(model.rows[0].released_at, Some(now() - Duration::hours(86)));
}

#[test]
fn test_history_is_scoped_to_channel_and_arch() {
    let catalog = history_catalog();

    let edge = FilterContext::new("latest", Risk::Edge, "amd64");
    let model = compute_view(
        &catalog,
        Some(&edge),
        &SelectionSet::new(),
        AvailableMode::All,
        &DisclosureState::new(),
        &ViewOptions::at(now()),
    );
    assert_eq!(ids(&model.rows), vec![1]);
    assert!(model.pinned.is_none());

    let beta = FilterContext::new("latest", Risk::Beta, "amd64");
    let model = compute_view(
        &catalog,
        Some(&beta),
        &SelectionSet::new(),
        AvailableMode::All,
        &DisclosureState::new(),
        &ViewOptions::at(now()),
    );
    assert!(model.is_empty());
}

#[test]
fn test_branch_history_and_pending_use_branch_channel() {
    let revisions: Vec<Revision> = (1..=4).map(|i| revision(i, "1.0", &["amd64"])).collect();
    let on_branch = |id, hours_ago| ReleaseRecord {
        branch: Some("hotfix".into()),
        ..release(id, Risk::Stable, "amd64", hours_ago)
    };
    let releases = vec![
        release(1, Risk::Stable, "amd64", 50),
        on_branch(2, 40),
        on_branch(3, 30),
        release(4, Risk::Stable, "amd64", 20),
    ];
    let mut pending = PendingChannelMap::new();
    pending
        .entry("latest/stable".into())
        .or_default()
        .insert("amd64".into(), RevisionId(1));
    pending
        .entry("latest/stable/hotfix".into())
        .or_default()
        .insert("amd64".into(), RevisionId(4));
    let catalog = catalog(CatalogStore {
        revisions,
        releases,
        pending,
    });
    let filter = FilterContext::new("latest", Risk::Stable, "amd64").with_branch("hotfix");
    assert_eq!(filter.channel(), "latest/stable/hotfix");

    let model = compute_view(
        &catalog,
        Some(&filter),
        &SelectionSet::new(),
        AvailableMode::All,
        &DisclosureState::new(),
        &ViewOptions::at(now()),
    );

    assert!(model.is_release_history);
    assert_eq!(model.title, "Releases history for amd64 in latest/stable/hotfix");
    // branchless releases to latest/stable stay out
    assert_eq!(ids(&model.rows), vec![3, 2]);
    let pinned = model.pinned.expect("pending row");
    assert_eq!(pinned.revision.id, RevisionId(4));
    assert_eq!(model.active_revision, Some(RevisionId(4)));
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn test_session_selection_walkthrough() {
    let catalog = only_revisions(vec![
        revision(1, "2.0", &["amd64"]),
        revision(2, "2.0", &["arm64"]),
        revision(3, "2.0", &["armhf"]),
        revision(4, "1.0", &["amd64"]),
    ]);
    let mut session = Session::new(catalog);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    session.set_filter(Some(amd64_available()));
    session.toggle(RevisionId(4));
    let model = session.view(now());
    assert_eq!(model.anchor.as_ref().map(|r| r.id), Some(RevisionId(4)));
    assert!(model.version_siblings.is_none());

    // selecting the newer revision moves the anchor to it
    session.toggle(RevisionId(1));
    let accepted = session.accept_siblings(SiblingKind::Version, now());
    assert_eq!(accepted, vec![RevisionId(2), RevisionId(3)]);
    assert_eq!(session.selection().len(), 4);

    let events = events.borrow();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], SessionEvent::FilterChanged { .. }));
    assert!(matches!(events[3], SessionEvent::SelectionChanged(ref ids) if ids.len() == 4));
}
