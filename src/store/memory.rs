//! In-memory store
//!
//! Same load/save contract as the file store without touching disk.
//! Loads hand out clones, so mutations only land through `save`.

use parking_lot::RwLock;

use crate::error::Result;
use crate::record::Collection;
use super::Store;

/// Collection held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `collection`
    pub fn with_collection(collection: Collection) -> Self {
        Self {
            collection: RwLock::new(collection),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.collection.read().len()
    }

    /// True if no records are stored
    pub fn is_empty(&self) -> bool {
        self.collection.read().is_empty()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Collection> {
        Ok(self.collection.read().clone())
    }

    fn save(&self, collection: &Collection) -> Result<()> {
        *self.collection.write() = collection.clone();
        Ok(())
    }
}
