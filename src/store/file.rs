//! JSON file store
//!
//! Keeps the collection as one pretty-printed JSON array in a single file.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{ProductError, Result};
use crate::record::Collection;
use super::Store;

/// File-backed store at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store over `path` (the file is not touched)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed an empty collection if the file does not exist yet.
    ///
    /// Returns true if the file was created.
    pub fn init(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        self.save(&Collection::new())?;
        tracing::info!("Created empty data file {}", self.path.display());
        Ok(true)
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Collection> {
        let data = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                tracing::debug!("Data file {} does not exist", self.path.display());
            }
            ProductError::Io(e)
        })?;

        let collection: Collection = serde_json::from_str(&data).map_err(|e| {
            ProductError::StoreParse(format!("{}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            "Loaded {} records from {}",
            collection.len(),
            self.path.display()
        );
        Ok(collection)
    }

    fn save(&self, collection: &Collection) -> Result<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, collection)
            .map_err(|e| ProductError::Io(e.into()))?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        tracing::debug!(
            "Saved {} records to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }
}
