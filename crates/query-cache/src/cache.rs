//! The query cache proper
//!
//! Entries sit behind `Arc`: cloning the cache is a cheap snapshot, and an
//! entry is copied only when it is dirtied or replaced.

use crate::entry::QueryCacheEntry;
use graphcache_core::{merge, QueryCachePointers, UpdatedIds, Value, Variables};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of [`QueryCache::read`]
#[derive(Debug, Clone, PartialEq)]
pub struct CachedQuery {
    /// The cached result, or `None` on a miss
    pub result: Option<Value>,
    /// The entry's `modified` flag, reported on hits and misses alike
    pub modified: bool,
}

impl CachedQuery {
    /// Whether the read was a hit
    pub fn is_hit(&self) -> bool {
        self.result.is_some()
    }
}

/// Query id -> cached result
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: FxHashMap<String, Arc<QueryCacheEntry>>,
}

impl QueryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached queries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry
    pub fn get(&self, query_id: &str) -> Option<&Arc<QueryCacheEntry>> {
        self.entries.get(query_id)
    }

    /// Ids of all cached queries, sorted
    pub fn query_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Insert or refresh the entry for `query_id`
    ///
    /// Every other entry touching `updated_ids` is dirtied first. If the
    /// query was already cached, the new result is merged against the old
    /// one so unchanged subtrees keep their identity. The stored entry is
    /// clean.
    ///
    /// Returns the ids of the queries that were dirtied.
    pub fn insert(
        &mut self,
        query_id: &str,
        result: Value,
        variables: Variables,
        pointers: QueryCachePointers,
        updated_ids: &UpdatedIds,
        modified: bool,
    ) -> Vec<String> {
        let dirtied = if updated_ids.is_empty() {
            Vec::new()
        } else {
            self.invalidate(Some(updated_ids), &[query_id])
        };

        let result = match self.entries.get(query_id) {
            Some(previous) => merge(&result, &previous.result),
            None => result,
        };
        trace!(target: "graphcache::cache", query_id, modified, "Query cached");
        self.entries.insert(
            query_id.to_string(),
            Arc::new(QueryCacheEntry::new(result, variables, pointers, modified)),
        );

        dirtied
    }

    /// Mark entries dirty
    ///
    /// With `Some(ids)`, only entries whose pointers intersect `ids`; with
    /// `None`, every entry. Entries named in `exclude` are left alone.
    ///
    /// Returns the ids of the queries that were dirtied, sorted.
    pub fn invalidate(&mut self, updated_ids: Option<&UpdatedIds>, exclude: &[&str]) -> Vec<String> {
        let mut dirtied: Vec<String> = self
            .entries
            .iter()
            .filter(|(query_id, _)| !exclude.contains(&query_id.as_str()))
            .filter(|(_, entry)| updated_ids.map_or(true, |ids| entry.touches(ids)))
            .map(|(query_id, _)| query_id.clone())
            .collect();

        if dirtied.is_empty() {
            return dirtied;
        }
        dirtied.sort_unstable();

        for query_id in &dirtied {
            if let Some(entry) = self.entries.get_mut(query_id) {
                Arc::make_mut(entry).dirty = true;
            }
        }
        debug!(target: "graphcache::cache", queries = ?dirtied, "Marked queries dirty");
        dirtied
    }

    /// Remove the entry for `query_id`
    pub fn remove(&mut self, query_id: &str) -> Option<Arc<QueryCacheEntry>> {
        let removed = self.entries.remove(query_id);
        if removed.is_some() {
            trace!(target: "graphcache::cache", query_id, "Query removed");
        }
        removed
    }

    /// Read a cached result
    ///
    /// A hit requires a clean entry, variables equal to the cached ones, and
    /// either `allow_modified` or an unmodified entry.
    pub fn read(&self, query_id: &str, variables: &Variables, allow_modified: bool) -> CachedQuery {
        let Some(entry) = self.entries.get(query_id) else {
            return CachedQuery {
                result: None,
                modified: false,
            };
        };

        let usable = !entry.dirty
            && (allow_modified || !entry.modified)
            && *variables == entry.variables;

        CachedQuery {
            result: usable.then(|| entry.result.clone()),
            modified: entry.modified,
        }
    }
}

impl PartialEq for QueryCache {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(query_id, entry)| {
                other
                    .entries
                    .get(query_id)
                    .is_some_and(|theirs| Arc::ptr_eq(entry, theirs) || entry == theirs)
            })
    }
}

impl Serialize for QueryCache {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ordered: BTreeMap<&String, &QueryCacheEntry> = self
            .entries
            .iter()
            .map(|(query_id, entry)| (query_id, entry.as_ref()))
            .collect();
        ordered.serialize(serializer)
    }
}
