//! In-memory document store
//!
//! Records are flat JSON objects grouped into one collection per model and
//! keyed by their `id`. Reads clone records out, so no lock is held while a
//! caller works with them.

use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;
use warden_resource::Document;

use crate::error::{CatalogError, CatalogResult};
use crate::models::Model;

/// A stored document.
pub type Record = Map<String, Value>;

/// Field holding a record's identity.
pub const ID_FIELD: &str = "id";

/// Thread-safe collection of records per model.
#[derive(Debug, Default)]
pub struct CatalogStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Record>>>,
}

impl CatalogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a typed model.
    pub fn insert<M: Model>(&self, model: &M) -> CatalogResult<Record> {
        self.insert_record(M::NAME, model.to_record()?)
    }

    /// Store a record under `model`, replacing any record with the same id.
    ///
    /// # Errors
    ///
    /// `CatalogError::Storage` if the record has no string `id`.
    pub fn insert_record(&self, model: &str, record: Record) -> CatalogResult<Record> {
        let id = match record.get(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => {
                return Err(CatalogError::Storage(format!(
                    "{model} record without an id"
                )))
            }
        };

        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(model.to_string())
            .or_default()
            .insert(id.clone(), record.clone());
        tracing::debug!(model, id = %id, "Stored record");
        Ok(record)
    }

    /// Build and store a new record from request parameters.
    ///
    /// Assigns a fresh id and both timestamps; `fields` may not override them.
    pub fn create(&self, model: &str, fields: &Map<String, Value>) -> CatalogResult<Record> {
        let now = Value::String(Utc::now().to_rfc3339());
        let mut record = fields.clone();
        record.insert(ID_FIELD.to_string(), Value::String(Uuid::now_v7().to_string()));
        record.insert("created_at".to_string(), now.clone());
        record.insert("updated_at".to_string(), now);
        self.insert_record(model, record)
    }

    /// Fetch a record by id.
    pub fn get(&self, model: &str, id: &str) -> Option<Record> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .and_then(|records| records.get(id))
            .cloned()
    }

    /// Every record of `model`, in id order.
    pub fn all(&self, model: &str) -> Vec<Record> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Records of `model` whose `field` equals `value`.
    pub fn find_all_by(&self, model: &str, field: &str, value: &Value) -> Vec<Record> {
        self.all(model)
            .into_iter()
            .filter(|record| record.get(field) == Some(value))
            .collect()
    }

    /// First record of `model` whose `field` equals `value`.
    pub fn find_by(&self, model: &str, field: &str, value: &Value) -> Option<Record> {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)?
            .values()
            .find(|record| record.get(field) == Some(value))
            .cloned()
    }

    /// Merge `changes` into a stored record and bump `updated_at`.
    ///
    /// Returns the updated record, or `None` if it does not exist. The id and
    /// creation time never change.
    pub fn update(
        &self,
        model: &str,
        id: &str,
        changes: &Map<String, Value>,
    ) -> Option<Record> {
        let mut collections = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        let record = collections.get_mut(model)?.get_mut(id)?;
        for (key, value) in changes {
            if key != ID_FIELD && key != "created_at" {
                record.insert(key.clone(), value.clone());
            }
        }
        record.insert(
            "updated_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Some(record.clone())
    }

    /// Remove a record, returning it.
    pub fn remove(&self, model: &str, id: &str) -> Option<Record> {
        let removed = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(model)?
            .remove(id);
        if removed.is_some() {
            tracing::debug!(model, id, "Removed record");
        }
        removed
    }

    /// Number of records of `model`.
    pub fn count(&self, model: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .map_or(0, BTreeMap::len)
    }

    /// Box a record for handing to the engine.
    pub fn boxed(record: Record) -> Box<dyn Document> {
        Box::new(record)
    }
}
