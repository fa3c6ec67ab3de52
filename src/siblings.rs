// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Revisions on other architectures that match the anchor revision
//!
//! When a revision is picked for one architecture, the same version (or the
//! same Launchpad build) usually exists for other architectures too. These
//! groups let the caller offer all of them in one action.

use crate::selection::SelectionSet;
use crate::types::{Revision, RevisionId};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

/// What the sibling revisions have in common with the anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SiblingKey {
    /// Same version string
    Version(String),
    /// Same build request id
    Build(String),
}

impl SiblingKey {
    fn matches(&self, revision: &Revision) -> bool {
        match self {
            Self::Version(version) => revision.version == *version,
            Self::Build(build) => revision.build_id.as_deref() == Some(build.as_str()),
        }
    }
}

/// Revisions offered for other architectures alongside the anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiblingGroup {
    /// Revision the group was derived from
    pub anchor: Revision,
    /// Shared version or build
    pub key: SiblingKey,
    /// At most one revision per architecture, in catalog order
    pub members: Vec<Revision>,
    /// Architectures the members cover; never the browsed one
    pub covered_architectures: BTreeSet<String>,
}

impl SiblingGroup {
    /// Ids of every member
    #[must_use]
    pub fn member_ids(&self) -> Vec<RevisionId> {
        self.members.iter().map(|r| r.id).collect()
    }

    /// Banner text for the group
    #[must_use]
    pub fn headline(&self) -> String {
        let count = self.covered_architectures.len();
        let plural = if count == 1 { "" } else { "s" };
        match &self.key {
            SiblingKey::Version(version) => {
                format!("{version} is available in {count} other architecture{plural}")
            }
            SiblingKey::Build(build) => format!(
                "{} build {build} is available in {count} other architecture{plural}",
                self.anchor.version
            ),
        }
    }
}

/// Revisions sharing the anchor's version on other architectures
#[must_use]
pub fn version_siblings(
    available: &[&Revision],
    anchor: &Revision,
    current_arch: &str,
    selection: &SelectionSet,
) -> Option<SiblingGroup> {
    let key = SiblingKey::Version(anchor.version.clone());
    collect(available, anchor, key, current_arch, selection)
}

/// Revisions sharing the anchor's build on other architectures
///
/// `None` when the anchor was not built from a build request.
#[must_use]
pub fn build_siblings(
    available: &[&Revision],
    anchor: &Revision,
    current_arch: &str,
    selection: &SelectionSet,
) -> Option<SiblingGroup> {
    let key = SiblingKey::Build(anchor.build_id.clone()?);
    collect(available, anchor, key, current_arch, selection)
}

fn collect(
    available: &[&Revision],
    anchor: &Revision,
    key: SiblingKey,
    current_arch: &str,
    selection: &SelectionSet,
) -> Option<SiblingGroup> {
    // first revision seen for an architecture wins
    let mut seen_archs: BTreeSet<&str> = BTreeSet::new();
    let mut candidates: Vec<&Revision> = Vec::new();
    for revision in available.iter().copied().filter(|r| key.matches(r)) {
        let adds_arch = revision
            .architectures
            .iter()
            .any(|arch| !seen_archs.contains(arch.as_str()));
        if adds_arch {
            seen_archs.extend(revision.architectures.iter().map(String::as_str));
            candidates.push(revision);
        } else {
            trace!("Revision {} adds no new architecture", revision.id);
        }
    }

    let members: Vec<Revision> = candidates
        .into_iter()
        .filter(|r| !selection.contains(r.id))
        .filter(|r| !r.has_arch(current_arch))
        .cloned()
        .collect();

    if members.is_empty() {
        return None;
    }

    // recomputed from survivors; the scan accumulator still holds dropped entries
    let covered_architectures = members
        .iter()
        .flat_map(|r| r.architectures.iter().cloned())
        .collect();

    Some(SiblingGroup {
        anchor: anchor.clone(),
        key,
        members,
        covered_architectures,
    })
}
