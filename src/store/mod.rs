//! Store Module
//!
//! Durable load/save of the whole product collection.
//!
//! ## Responsibilities
//! - Materialize the full collection on every load (no cache)
//! - Rewrite the full collection on every save (no append, no patch)
//!
//! ## File Format
//! ```text
//! [
//!   {
//!     "id": 1,
//!     "name": "Widget",
//!     "description": "A widget",
//!     ...opaque fields...
//!   },
//!   ...
//! ]
//! ```
//!
//! ## Consistency
//! A mutation is "load whole file, change in memory, save whole file".
//! Nothing spans the load/save window, so two interleaved writers lose the
//! earlier save. `ProductService` can optionally serialize mutations.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::record::Collection;

/// Load/save seam over the persisted collection
pub trait Store: Send + Sync {
    /// Read the full collection
    fn load(&self) -> Result<Collection>;

    /// Replace the persisted collection with `collection`
    fn save(&self, collection: &Collection) -> Result<()>;
}
