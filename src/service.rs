//! Service Module
//!
//! The product operations, run against a `Store`.
//!
//! ## Responsibilities
//! - Parse request bodies into records
//! - Load the collection, apply one change in memory, save it back
//! - Report outcomes as `Reply` values or `ProductError`s
//!
//! ## Concurrency Model
//! Each mutation is an unguarded load → change → save cycle. Two mutations
//! that interleave lose the first save (last writer wins). With
//! `serialize_mutations` enabled, a process-wide mutex covers the whole
//! cycle; other processes writing the same file are still not excluded.

use parking_lot::Mutex;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ProductError, Result};
use crate::record::{self, Collection, Record};
use crate::router::{Route, COLLECTION_PATH};
use crate::store::{JsonFileStore, Store};

/// Successful outcome of an operation
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The full collection
    Collection(Collection),

    /// A single record
    Record(Record),

    /// A record was appended; `location` addresses it
    Created { location: String },

    /// A record was replaced or patched
    Updated,

    /// A record was removed
    Deleted,
}

/// Product operations over a store
pub struct ProductService<S: Store> {
    store: S,

    /// Held across a mutation's load/save window when enabled
    mutation_lock: Option<Mutex<()>>,
}

impl ProductService<JsonFileStore> {
    /// Open a file-backed service from config
    ///
    /// Seeds the data file first when `create_if_missing` is set.
    pub fn open(config: &Config) -> Result<Self> {
        let store = JsonFileStore::new(&config.data_file);
        if config.create_if_missing {
            store.init()?;
        }
        Ok(Self::new(store, config.serialize_mutations))
    }
}

impl<S: Store> ProductService<S> {
    /// Create a service over `store`
    pub fn new(store: S, serialize_mutations: bool) -> Self {
        Self {
            store,
            mutation_lock: serialize_mutations.then(|| Mutex::new(())),
        }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute a routed request
    ///
    /// `body` is only read by routes that take one.
    pub fn execute(&self, route: Route, body: &[u8]) -> Result<Reply> {
        match route {
            Route::List => self.list().map(Reply::Collection),
            Route::Get { id } => self.get(&id).map(Reply::Record),
            Route::Create => {
                let record = parse_create_body(body)?;
                self.create(record)
            }
            Route::Replace { id } => {
                let replacement = parse_json_body(body)?;
                self.replace(&id, replacement)
            }
            Route::Patch { id } => {
                let patch = parse_json_body(body)?;
                self.patch(&id, patch)
            }
            Route::Delete { id } => self.delete(&id),
        }
    }

    /// Return the whole collection
    pub fn list(&self) -> Result<Collection> {
        self.store.load()
    }

    /// Return the first record addressed by `id`
    pub fn get(&self, id: &str) -> Result<Record> {
        let collection = self.store.load()?;
        collection
            .into_iter()
            .find(|record| record.matches_id(id))
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Append a record after checking its required fields.
    ///
    /// Duplicate ids are not rejected.
    pub fn create(&self, record: Record) -> Result<Reply> {
        if !record.has_required_fields() {
            return Err(ProductError::Validation);
        }

        let location = location_for(&record);
        self.mutate(|collection| {
            collection.push(record);
            Ok(())
        })?;

        Ok(Reply::Created { location })
    }

    /// Replace the first record addressed by `id` wholesale.
    ///
    /// The id is resolved before the body's shape is checked, so an unknown
    /// id is always not-found. A non-object replacement is rejected as a
    /// body parse failure. The replacement's own `id` is not checked
    /// against the path id.
    pub fn replace(&self, id: &str, replacement: Value) -> Result<Reply> {
        self.mutate(|collection| {
            let index = find_index(collection, id)?;
            collection[index] = Record::from_value(replacement)
                .ok_or_else(|| ProductError::BodyParse("expected a JSON object".to_string()))?;
            Ok(())
        })?;
        Ok(Reply::Updated)
    }

    /// Shallow-merge `patch` into the first record addressed by `id`.
    ///
    /// A patch that is not a JSON object (null, scalar, array) merges no
    /// fields: the record is left as it was and the call still succeeds.
    pub fn patch(&self, id: &str, patch: Value) -> Result<Reply> {
        self.mutate(|collection| {
            let index = find_index(collection, id)?;
            if let Some(fields) = Record::from_value(patch) {
                collection[index].merge(fields);
            }
            Ok(())
        })?;
        Ok(Reply::Updated)
    }

    /// Remove the first record addressed by `id`
    pub fn delete(&self, id: &str) -> Result<Reply> {
        self.mutate(|collection| {
            let index = find_index(collection, id)?;
            collection.remove(index);
            Ok(())
        })?;
        Ok(Reply::Deleted)
    }

    /// Load, apply `change`, save. Nothing is saved if `change` fails.
    fn mutate<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Collection) -> Result<()>,
    {
        let _guard = self.mutation_lock.as_ref().map(|lock| lock.lock());

        let mut collection = self.store.load()?;
        change(&mut collection)?;
        self.store.save(&collection)
    }
}

fn find_index(collection: &[Record], id: &str) -> Result<usize> {
    record::position(collection, id).ok_or_else(|| ProductError::NotFound(id.to_string()))
}

/// `/product/{id}` for a record, using the id's string form
pub fn location_for(record: &Record) -> String {
    let id = record
        .id_string()
        .or_else(|| record.get("id").map(Value::to_string))
        .unwrap_or_default();
    format!("{}/{}", COLLECTION_PATH, id)
}

/// Parse a create body.
///
/// Malformed JSON is a parse failure; well-formed JSON that is not an
/// object simply lacks the required fields.
pub fn parse_create_body(body: &[u8]) -> Result<Record> {
    Record::from_value(parse_json_body(body)?).ok_or(ProductError::Validation)
}

/// Parse a replace/patch body as any JSON value.
///
/// The shape is judged by the operation, after the id has been resolved.
pub fn parse_json_body(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|e| ProductError::BodyParse(e.to_string()))
}
