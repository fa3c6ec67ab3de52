// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Session state around the grouping engine
//!
//! A [`Session`] owns the inputs the engine is recomputed from: a shared
//! catalog snapshot, the filter, the available-revisions mode, the selection
//! and the disclosure state. Views are never cached, so a refreshed catalog
//! can't leave stale sibling groups behind.

use crate::catalog::Catalog;
use crate::disclosure::{DisclosureState, GroupingKey};
use crate::selection::SelectionSet;
use crate::types::{AvailableMode, FilterContext, RevisionId};
use crate::view::{compute_view, ViewModel, ViewOptions, DEFAULT_PAGE_SIZE, DEFAULT_RECENT_DAYS};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Which sibling group to accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingKind {
    /// Same version on other architectures
    Version,
    /// Same build on other architectures
    Build,
}

/// Change notifications delivered to session listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Selection changed; carries the full selection after the change
    SelectionChanged(BTreeSet<RevisionId>),
    /// A list was expanded
    Revealed(GroupingKey),
    /// Filter or mode changed
    FilterChanged {
        /// New filter
        filter: Option<FilterContext>,
        /// New mode
        mode: AvailableMode,
    },
    /// Catalog snapshot replaced
    CatalogRefreshed {
        /// Generation after the refresh
        generation: u64,
    },
}

type Listener = Box<dyn FnMut(&SessionEvent)>;

/// Inputs to the grouping engine plus change listeners
pub struct Session {
    catalog: Arc<Catalog>,
    generation: u64,
    filter: Option<FilterContext>,
    mode: AvailableMode,
    selection: SelectionSet,
    disclosure: DisclosureState,
    page_size: usize,
    recent_days: i64,
    listeners: Vec<Listener>,
}

impl Session {
    /// Start a session over `catalog` with nothing filtered or selected
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            generation: 0,
            filter: None,
            mode: AvailableMode::default(),
            selection: SelectionSet::new(),
            disclosure: DisclosureState::new(),
            page_size: DEFAULT_PAGE_SIZE,
            recent_days: DEFAULT_RECENT_DAYS,
            listeners: Vec::new(),
        }
    }

    /// Set page size and recent window
    #[must_use]
    pub fn with_limits(mut self, page_size: usize, recent_days: i64) -> Self {
        self.page_size = page_size;
        self.recent_days = recent_days;
        self
    }

    /// Register a listener for session events
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: &SessionEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    /// Current catalog snapshot
    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Number of catalog refreshes so far
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current filter
    #[must_use]
    pub fn filter(&self) -> Option<&FilterContext> {
        self.filter.as_ref()
    }

    /// Current available-revisions mode
    #[must_use]
    pub fn mode(&self) -> AvailableMode {
        self.mode
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Current disclosure state
    #[must_use]
    pub fn disclosure(&self) -> &DisclosureState {
        &self.disclosure
    }

    /// Disclosure key of the list currently in view
    #[must_use]
    pub fn grouping_key(&self) -> GroupingKey {
        GroupingKey::new(self.filter.as_ref(), self.mode)
    }

    /// Swap in a freshly loaded catalog
    ///
    /// Readers holding the previous `Arc` keep their snapshot.
    pub fn refresh(&mut self, catalog: Catalog) {
        self.catalog = Arc::new(catalog);
        self.generation += 1;
        info!(
            "Catalog refreshed: {} revisions (generation {})",
            self.catalog.len(),
            self.generation
        );
        let event = SessionEvent::CatalogRefreshed {
            generation: self.generation,
        };
        self.emit(&event);
    }

    /// Change the filter; `None` shows the unfiltered list
    pub fn set_filter(&mut self, filter: Option<FilterContext>) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        self.emit_filter_changed();
    }

    /// Change the available-revisions mode
    pub fn set_mode(&mut self, mode: AvailableMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.emit_filter_changed();
    }

    fn emit_filter_changed(&mut self) {
        let event = SessionEvent::FilterChanged {
            filter: self.filter.clone(),
            mode: self.mode,
        };
        self.emit(&event);
    }

    /// Toggle one revision
    pub fn toggle(&mut self, id: RevisionId) -> bool {
        let selected = self.selection.toggle(id);
        let event = SessionEvent::SelectionChanged(self.selection.ids());
        self.emit(&event);
        selected
    }

    /// Toggle several revisions as one change
    ///
    /// Listeners are told once, after every id has been applied.
    pub fn toggle_many<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = RevisionId>,
    {
        self.selection.toggle_many(ids);
        let event = SessionEvent::SelectionChanged(self.selection.ids());
        self.emit(&event);
    }

    /// Expand the list currently in view
    pub fn reveal(&mut self) -> bool {
        self.reveal_key(self.grouping_key())
    }

    /// Expand the list for `key`
    pub fn reveal_key(&mut self, key: GroupingKey) -> bool {
        let changed = self.disclosure.reveal(key.clone());
        if changed {
            self.emit(&SessionEvent::Revealed(key));
        }
        changed
    }

    /// Compute the view for the current inputs
    #[must_use]
    pub fn view(&self, now: DateTime<Utc>) -> ViewModel {
        let options = ViewOptions {
            page_size: self.page_size,
            recent_days: self.recent_days,
            now,
        };
        compute_view(
            self.catalog.as_ref(),
            self.filter.as_ref(),
            &self.selection,
            self.mode,
            &self.disclosure,
            &options,
        )
    }

    /// Select every member of the current sibling group of `kind`
    ///
    /// Returns the ids that were toggled; empty when there is no such group.
    pub fn accept_siblings(&mut self, kind: SiblingKind, now: DateTime<Utc>) -> Vec<RevisionId> {
        let model = self.view(now);
        let group = match kind {
            SiblingKind::Version => model.version_siblings,
            SiblingKind::Build => model.build_siblings,
        };
        let Some(group) = group else {
            debug!("No {:?} sibling group to accept", kind);
            return Vec::new();
        };
        let ids = group.member_ids();
        self.toggle_many(ids.iter().copied());
        ids
    }
}
