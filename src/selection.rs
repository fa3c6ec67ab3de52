// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Revisions the user has chosen to release

use crate::types::{Revision, RevisionId};
use std::collections::{BTreeSet, HashMap};

/// Set of explicitly selected revision ids
///
/// Each member remembers when it was selected so the engine can tell which
/// selection is the most recent one for an architecture. Iteration order is
/// not part of the contract.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    members: HashMap<RevisionId, u64>,
    next_seq: u64,
}

impl SelectionSet {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is selected
    #[must_use]
    pub fn contains(&self, id: RevisionId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of selected revisions
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Selected ids, sorted
    #[must_use]
    pub fn ids(&self) -> BTreeSet<RevisionId> {
        self.members.keys().copied().collect()
    }

    /// Flip membership of `id`; returns whether it is now selected
    pub fn toggle(&mut self, id: RevisionId) -> bool {
        if self.members.remove(&id).is_some() {
            false
        } else {
            self.members.insert(id, self.next_seq);
            self.next_seq += 1;
            true
        }
    }

    /// Toggle every distinct id once
    ///
    /// Repeated ids in `ids` are collapsed first, so the result only depends
    /// on the set of ids passed in.
    pub fn toggle_many<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = RevisionId>,
    {
        let distinct: BTreeSet<RevisionId> = ids.into_iter().collect();
        for id in distinct {
            self.toggle(id);
        }
    }

    /// Most recently selected revision among `candidates` that runs on `arch`
    #[must_use]
    pub fn latest_for_arch<'a>(
        &self,
        candidates: &[&'a Revision],
        arch: &str,
    ) -> Option<&'a Revision> {
        candidates
            .iter()
            .copied()
            .filter(|r| r.has_arch(arch))
            .filter_map(|r| self.members.get(&r.id).map(|seq| (*seq, r)))
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, r)| r)
    }
}

impl FromIterator<RevisionId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = RevisionId>>(iter: T) -> Self {
        let mut selection = Self::new();
        for id in iter {
            if !selection.contains(id) {
                selection.toggle(id);
            }
        }
        selection
    }
}
