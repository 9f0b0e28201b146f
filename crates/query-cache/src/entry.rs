//! One cached query result

use graphcache_core::{QueryCachePointers, UpdatedIds, Value, Variables};
use serde::Serialize;

/// Cached result of one query, plus what it needs for invalidation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryCacheEntry {
    /// The result tree as returned to callers
    pub result: Value,
    /// Variables the result was produced with
    pub variables: Variables,
    /// Entity id -> subtrees of `result` denoting that entity
    pub pointers: QueryCachePointers,
    /// The result may no longer reflect the store
    pub dirty: bool,
    /// The result reflects a local, unconfirmed update
    pub modified: bool,
}

impl QueryCacheEntry {
    /// Fresh, clean entry
    pub fn new(result: Value, variables: Variables, pointers: QueryCachePointers, modified: bool) -> Self {
        QueryCacheEntry {
            result,
            variables,
            pointers,
            dirty: false,
            modified,
        }
    }

    /// Whether any entity in `ids` is denoted by this entry's result
    pub fn touches(&self, ids: &UpdatedIds) -> bool {
        self.pointers.keys().any(|id| ids.contains(id))
    }
}
