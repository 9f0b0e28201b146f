//! Flat entity store
//!
//! The normalized form of query results:
//! - NormalizedStore: entity id -> StoreObject
//! - StoreObject: storage field key -> StoreValue
//! - StoreValue: Scalar, Json (opaque composite), Reference, or List
//!
//! Entities never hold each other directly. A [`StoreValue::Reference`] names
//! another record by id and every hop is a lookup in the store.
//!
//! ## Generated ids
//!
//! Entities without a caller-supplied identity receive an id derived from
//! their position in the result tree. Such ids start with
//! [`GENERATED_ID_SENTINEL`]; a caller-supplied id must never do so.

use crate::value::Value;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Id of the record every query operation is written under
pub const ROOT_QUERY_ID: &str = "ROOT_QUERY";

/// Leading character reserved for generated ids
pub const GENERATED_ID_SENTINEL: char = '$';

/// Check whether an id was generated from tree position
pub fn is_generated_id(id: &str) -> bool {
    id.starts_with(GENERATED_ID_SENTINEL)
}

/// Turn a position seed into a generated id
///
/// Seeds that already look generated (because their owner was generated)
/// are returned unchanged so the sentinel is never doubled.
pub fn generated_id(seed: &str) -> String {
    if is_generated_id(seed) {
        seed.to_string()
    } else {
        format!("{GENERATED_ID_SENTINEL}{seed}")
    }
}

/// Pointer from one record to another
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdValue {
    /// Target entity id
    pub id: String,
    /// Whether `id` was generated from tree position
    pub generated: bool,
}

impl IdValue {
    /// Reference to an id supplied by an identity function
    pub fn stable(id: impl Into<String>) -> Self {
        IdValue {
            id: id.into(),
            generated: false,
        }
    }

    /// Reference to an id generated from tree position
    pub fn generated(id: impl Into<String>) -> Self {
        IdValue {
            id: id.into(),
            generated: true,
        }
    }
}

/// A value held by one field of a [`StoreObject`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreValue {
    /// Primitive value, including null
    Scalar(Value),
    /// Composite value stored verbatim
    ///
    /// Escaped so it can never be mistaken for a reference.
    Json(Value),
    /// Pointer to another record
    Reference(IdValue),
    /// Ordered sequence of stored values, possibly nested
    List(Vec<StoreValue>),
}

impl StoreValue {
    /// Stored form of a leaf value
    ///
    /// Composites become [`StoreValue::Json`]; everything else is a scalar.
    pub fn leaf(value: &Value) -> Self {
        if value.is_composite() {
            StoreValue::Json(value.clone())
        } else {
            StoreValue::Scalar(value.clone())
        }
    }

    /// Stored null
    pub fn null() -> Self {
        StoreValue::Scalar(Value::Null)
    }

    /// Get the reference if this is one
    pub fn as_reference(&self) -> Option<&IdValue> {
        match self {
            StoreValue::Reference(r) => Some(r),
            _ => None,
        }
    }
}

/// One normalized entity: storage field key -> stored value
pub type StoreObject = BTreeMap<String, StoreValue>;

/// Entity id -> the result subtrees that denote it, in write order
pub type QueryCachePointers = BTreeMap<String, Vec<Value>>;

/// Ids of records whose stored data changed during a write
pub type UpdatedIds = BTreeSet<String>;

/// Id-indexed collection of normalized records
///
/// Records sit behind `Arc`. A write that changes a field installs a new
/// record, so a cloned store is a cheap snapshot that later writes do not
/// disturb.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedStore {
    records: FxHashMap<String, Arc<StoreObject>>,
}

impl NormalizedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check whether a record exists
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Get a record
    pub fn get(&self, id: &str) -> Option<&Arc<StoreObject>> {
        self.records.get(id)
    }

    /// Get one field of a record
    pub fn field(&self, id: &str, key: &str) -> Option<&StoreValue> {
        self.records.get(id).and_then(|record| record.get(key))
    }

    /// Install a record, replacing any previous one
    pub fn insert(&mut self, id: impl Into<String>, record: StoreObject) {
        self.records.insert(id.into(), Arc::new(record));
    }

    /// Remove a record
    pub fn remove(&mut self, id: &str) -> Option<Arc<StoreObject>> {
        self.records.remove(id)
    }

    /// Set one field, installing a fresh copy of the record
    ///
    /// Creates the record if it does not exist yet.
    pub fn set_field(&mut self, id: &str, key: impl Into<String>, value: StoreValue) {
        let mut record = self
            .records
            .get(id)
            .map(|existing| StoreObject::clone(existing))
            .unwrap_or_default();
        record.insert(key.into(), value);
        self.records.insert(id.to_string(), Arc::new(record));
    }

    /// Iterate over all records
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Arc<StoreObject>)> {
        self.records.iter()
    }

    /// Ids of all records, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Serialize for NormalizedStore {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Sorted so snapshots are stable across runs
        let ordered: BTreeMap<&String, &StoreObject> = self
            .records
            .iter()
            .map(|(id, record)| (id, record.as_ref()))
            .collect();
        ordered.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NormalizedStore {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = BTreeMap::<String, StoreObject>::deserialize(deserializer)?;
        Ok(NormalizedStore {
            records: records
                .into_iter()
                .map(|(id, record)| (id, Arc::new(record)))
                .collect(),
        })
    }
}

impl FromIterator<(String, StoreObject)> for NormalizedStore {
    fn from_iter<I: IntoIterator<Item = (String, StoreObject)>>(iter: I) -> Self {
        NormalizedStore {
            records: iter
                .into_iter()
                .map(|(id, record)| (id, Arc::new(record)))
                .collect(),
        }
    }
}
