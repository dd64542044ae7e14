//! # Inspection Storage
//!
//! The host application owns persistence; the engine only needs to put,
//! fetch, list and delete whole [`Inspection`] records, and to write the
//! `sizing` field of an existing one.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: cloneable handle over a shared
//!   `parking_lot::RwLock<HashMap>`. Locks are never held across calls
//!   into other code.
//!
//! - [`JsonDirStore`]: one `<id>.json` file per inspection in a
//!   directory. Unreadable files are skipped by `list` with a warning so
//!   one corrupt record does not hide the rest.
//!
//! Both list most recently updated first, ties broken by id.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use vistoria_core::InspectionId;

use crate::inspection::Inspection;
use crate::sizing::SizingResult;

/// Default page size for [`InspectionStore::recent`].
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("inspection {id} not found")]
    NotFound { id: InspectionId },

    #[error("corrupt inspection record at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence seam for inspection records.
pub trait InspectionStore: Send + Sync {
    /// Insert or replace a record.
    fn put(&self, inspection: &Inspection) -> StoreResult<()>;

    fn get(&self, id: &InspectionId) -> StoreResult<Option<Inspection>>;

    /// Up to `limit` records, most recently updated first.
    fn list(&self, limit: usize) -> StoreResult<Vec<Inspection>>;

    /// Remove a record. Returns whether it existed.
    fn delete(&self, id: &InspectionId) -> StoreResult<bool>;

    fn recent(&self) -> StoreResult<Vec<Inspection>> {
        self.list(DEFAULT_LIST_LIMIT)
    }

    /// Replace the sizing of an existing record and persist it.
    fn update_sizing(&self, id: &InspectionId, sizing: SizingResult) -> StoreResult<Inspection> {
        let mut inspection = self.get(id)?.ok_or(StoreError::NotFound { id: *id })?;
        inspection.apply_sizing(sizing);
        self.put(&inspection)?;
        Ok(inspection)
    }
}

fn most_recent_first(records: &mut [Inspection]) {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<InspectionId, Inspection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InspectionStore for MemoryStore {
    fn put(&self, inspection: &Inspection) -> StoreResult<()> {
        self.data.write().insert(inspection.id, inspection.clone());
        Ok(())
    }

    fn get(&self, id: &InspectionId) -> StoreResult<Option<Inspection>> {
        Ok(self.data.read().get(id).cloned())
    }

    fn list(&self, limit: usize) -> StoreResult<Vec<Inspection>> {
        let mut all: Vec<Inspection> = self.data.read().values().cloned().collect();
        most_recent_first(&mut all);
        all.truncate(limit);
        Ok(all)
    }

    fn delete(&self, id: &InspectionId) -> StoreResult<bool> {
        Ok(self.data.write().remove(id).is_some())
    }

    fn update_sizing(&self, id: &InspectionId, sizing: SizingResult) -> StoreResult<Inspection> {
        let mut guard = self.data.write();
        let entry = guard.get_mut(id).ok_or(StoreError::NotFound { id: *id })?;
        entry.apply_sizing(sizing);
        Ok(entry.clone())
    }
}

// ---------------------------------------------------------------------------
// JSON directory
// ---------------------------------------------------------------------------

/// One pretty-printed JSON file per inspection.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &InspectionId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn read(path: &Path) -> StoreResult<Inspection> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl InspectionStore for JsonDirStore {
    fn put(&self, inspection: &Inspection) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(inspection)?;
        // Write to a sibling file first so readers never see a partial record.
        let path = self.path_for(&inspection.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, id: &InspectionId) -> StoreResult<Option<Inspection>> {
        match Self::read(&self.path_for(id)) {
            Ok(inspection) => Ok(Some(inspection)),
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn list(&self, limit: usize) -> StoreResult<Vec<Inspection>> {
        let mut all = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path) {
                Ok(inspection) => all.push(inspection),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        reason = %e,
                        "skipping unreadable inspection"
                    );
                }
            }
        }
        most_recent_first(&mut all);
        all.truncate(limit);
        Ok(all)
    }

    fn delete(&self, id: &InspectionId) -> StoreResult<bool> {
        match fs::remove_file(self.path_for(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
