// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Revision catalog: the immutable snapshot the engine computes over

use crate::source::RevisionSource;
use crate::types::{CatalogStore, PendingChannelMap, ReleaseRecord, Revision, RevisionId};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Reasons a snapshot is rejected at load time
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Snapshot file could not be read or written
    #[error("failed to access {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Snapshot file is not valid JSON for a catalog
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// Catalog could not be encoded as JSON
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        /// File being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// A revision lists no architectures
    #[error("revision {0} has no architectures")]
    NoArchitectures(RevisionId),
    /// Two revisions share an id
    #[error("duplicate revision {0}")]
    DuplicateRevision(RevisionId),
    /// A release record points at a revision not in the catalog
    #[error("release of unknown revision {revision} to {channel}")]
    UnknownReleased {
        /// Missing revision
        revision: RevisionId,
        /// Channel of the record
        channel: String,
    },
    /// A pending entry points at a revision not in the catalog
    #[error("pending revision {revision} for {channel} on {arch} is not in the catalog")]
    UnknownPending {
        /// Missing revision
        revision: RevisionId,
        /// Channel of the entry
        channel: String,
        /// Architecture of the entry
        arch: String,
    },
}

/// Validated, read-only set of revisions keyed by id
///
/// Revisions keep the order they were loaded in. Nothing here reorders them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    revisions: Vec<Revision>,
    index: HashMap<RevisionId, usize>,
    releases: Vec<ReleaseRecord>,
    pending: PendingChannelMap,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a snapshot and build the catalog from it
    pub fn from_store(store: CatalogStore) -> Result<Self, CatalogError> {
        let CatalogStore {
            revisions,
            releases,
            pending,
        } = store;

        let mut index = HashMap::with_capacity(revisions.len());
        for (pos, revision) in revisions.iter().enumerate() {
            if revision.architectures.is_empty() {
                return Err(CatalogError::NoArchitectures(revision.id));
            }
            if index.insert(revision.id, pos).is_some() {
                return Err(CatalogError::DuplicateRevision(revision.id));
            }
        }

        if let Some(record) = releases.iter().find(|r| !index.contains_key(&r.revision)) {
            return Err(CatalogError::UnknownReleased {
                revision: record.revision,
                channel: crate::types::channel_name(
                    &record.track,
                    record.risk,
                    record.branch.as_deref(),
                ),
            });
        }

        for (channel, archs) in &pending {
            for (arch, id) in archs {
                if !index.contains_key(id) {
                    return Err(CatalogError::UnknownPending {
                        revision: *id,
                        channel: channel.clone(),
                        arch: arch.clone(),
                    });
                }
            }
        }

        Ok(Self {
            revisions,
            index,
            releases,
            pending,
        })
    }

    /// Load a catalog from a JSON snapshot file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store: CatalogStore =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_store(store)?;
        info!(
            "Loaded {} revisions and {} releases from {}",
            catalog.len(),
            catalog.releases.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Write the catalog back out as a JSON snapshot
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(&self.to_store()).map_err(|source| {
            CatalogError::Serialize {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, json).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Copy the catalog back into its snapshot form
    #[must_use]
    pub fn to_store(&self) -> CatalogStore {
        CatalogStore {
            revisions: self.revisions.clone(),
            releases: self.releases.clone(),
            pending: self.pending.clone(),
        }
    }

    /// Number of revisions
    #[must_use]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Whether the catalog has no revisions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Every architecture any revision runs on
    #[must_use]
    pub fn architectures(&self) -> BTreeSet<&str> {
        self.revisions
            .iter()
            .flat_map(|r| r.architectures.iter().map(String::as_str))
            .collect()
    }

    /// Distinct versions, in order of first appearance
    #[must_use]
    pub fn versions(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.revisions
            .iter()
            .map(|r| r.version.as_str())
            .filter(|v| seen.insert(*v))
            .collect()
    }
}

impl RevisionSource for Catalog {
    fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    fn revision(&self, id: RevisionId) -> Option<&Revision> {
        self.index.get(&id).map(|&pos| &self.revisions[pos])
    }

    fn releases(&self) -> &[ReleaseRecord] {
        &self.releases
    }

    fn pending_channel_map(&self) -> &PendingChannelMap {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Risk;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn make_test_revision(id: u64, archs: &[&str]) -> Revision {
        Revision {
            id: RevisionId(id),
            version: "1.0".into(),
            build_id: None,
            architectures: archs.iter().map(|a| (*a).to_string()).collect(),
            devmode: false,
            channels: BTreeMap::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_from_store_keeps_load_order() {
        let store = CatalogStore {
            revisions: vec![
                make_test_revision(9, &["amd64"]),
                make_test_revision(2, &["arm64"]),
                make_test_revision(5, &["s390x"]),
            ],
            ..CatalogStore::default()
        };
        let catalog = Catalog::from_store(store).unwrap();

        let ids: Vec<u64> = catalog.revisions().iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![9, 2, 5]);
        assert_eq!(catalog.revision(RevisionId(2)).unwrap().id, RevisionId(2));
        assert!(catalog.revision(RevisionId(3)).is_none());
    }

    #[test]
    fn test_rejects_empty_architectures() {
        let store = CatalogStore {
            revisions: vec![make_test_revision(1, &[])],
            ..CatalogStore::default()
        };
        let err = Catalog::from_store(store).unwrap_err();
        assert!(matches!(err, CatalogError::NoArchitectures(RevisionId(1))));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let store = CatalogStore {
            revisions: vec![
                make_test_revision(1, &["amd64"]),
                make_test_revision(1, &["arm64"]),
            ],
            ..CatalogStore::default()
        };
        assert!(matches!(
            Catalog::from_store(store),
            Err(CatalogError::DuplicateRevision(RevisionId(1)))
        ));
    }

    #[test]
    fn test_rejects_dangling_release_and_pending() {
        let release = ReleaseRecord {
            revision: RevisionId(7),
            track: "latest".into(),
            risk: Risk::Stable,
            branch: None,
            architecture: "amd64".into(),
            released_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
        };
        let store = CatalogStore {
            revisions: vec![make_test_revision(1, &["amd64"])],
            releases: vec![release],
            pending: PendingChannelMap::new(),
        };
        let err = Catalog::from_store(store).unwrap_err();
        assert!(err.to_string().contains("latest/stable"));

        let mut pending = PendingChannelMap::new();
        pending
            .entry("latest/edge".into())
            .or_default()
            .insert("amd64".into(), RevisionId(8));
        let store = CatalogStore {
            revisions: vec![make_test_revision(1, &["amd64"])],
            releases: vec![],
            pending,
        };
        assert!(matches!(
            Catalog::from_store(store),
            Err(CatalogError::UnknownPending { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let store = CatalogStore {
            revisions: vec![
                make_test_revision(1, &["amd64"]),
                make_test_revision(2, &["arm64", "armhf"]),
            ],
            ..CatalogStore::default()
        };
        Catalog::from_store(store.clone()).unwrap().save(&path).unwrap();

        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded.to_store(), store);
        assert_eq!(
            loaded.architectures().into_iter().collect::<Vec<_>>(),
            vec!["amd64", "arm64", "armhf"]
        );
        assert_eq!(loaded.versions(), vec!["1.0"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Catalog::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_save_errors_name_the_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog = Catalog::from_store(CatalogStore {
            revisions: vec![make_test_revision(1, &["amd64"])],
            ..CatalogStore::default()
        })
        .unwrap();
        // a directory can't be written as a file
        let err = catalog.save(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));

        let err = CatalogError::Serialize {
            path: PathBuf::from("out.json"),
            source: <serde_json::Error as serde::ser::Error>::custom("key must be a string"),
        };
        assert_eq!(
            err.to_string(),
            "failed to serialize out.json: key must be a string"
        );
    }
}
