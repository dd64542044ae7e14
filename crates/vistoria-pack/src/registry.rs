//! Pack registry.
//!
//! Holds the packs an application can choose from and the id of the
//! active default. Packs are immutable and shared as `Arc<dyn Pack>`.

use std::sync::Arc;

use crate::base::{BasePack, BASE_PACK_ID};
use crate::error::{PackError, PackResult};
use crate::official::{OfficialPack, TableSettings};
use crate::pack::{Pack, PackInfo};

#[derive(Debug, Clone)]
pub struct PackRegistry {
    packs: Vec<Arc<dyn Pack>>,
    default_id: String,
}

impl PackRegistry {
    /// Empty registry. The default id is `sp-base` until changed.
    pub fn empty() -> Self {
        Self {
            packs: Vec::new(),
            default_id: BASE_PACK_ID.to_string(),
        }
    }

    /// Registry with both São Paulo packs, base as default.
    pub fn new() -> Self {
        Self::with_table_settings(&TableSettings::default())
    }

    /// Registry with both São Paulo packs, the official one configured
    /// with `settings`.
    pub fn with_table_settings(settings: &TableSettings) -> Self {
        Self {
            packs: vec![
                Arc::new(BasePack::new()),
                Arc::new(OfficialPack::with_settings(settings)),
            ],
            default_id: BASE_PACK_ID.to_string(),
        }
    }

    /// Add a pack. Ids must be unique.
    pub fn register(&mut self, pack: Arc<dyn Pack>) -> PackResult<()> {
        let id = pack.info().id.clone();
        if self.get(&id).is_some() {
            return Err(PackError::Validation(format!(
                "pack {id:?} is already registered"
            )));
        }
        self.packs.push(pack);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Pack>> {
        self.packs.iter().find(|p| p.info().id == id).cloned()
    }

    /// Like [`get`](Self::get) but an unknown id is an error.
    pub fn select(&self, id: &str) -> PackResult<Arc<dyn Pack>> {
        self.get(id).ok_or_else(|| PackError::UnknownPack { id: id.to_string() })
    }

    /// The default pack, if registered.
    pub fn default_pack(&self) -> Option<Arc<dyn Pack>> {
        self.get(&self.default_id)
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn set_default(&mut self, id: &str) -> PackResult<()> {
        self.select(id)?;
        self.default_id = id.to_string();
        Ok(())
    }

    /// Registered pack metadata, in registration order.
    pub fn infos(&self) -> Vec<&PackInfo> {
        self.packs.iter().map(|p| p.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}

impl Default for PackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
