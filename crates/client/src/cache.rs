//! The store / query-cache pair every entry point works on

use graphcache_core::{NormalizedStore, UpdatedIds, Variables};
use graphcache_query_cache::{CachedQuery, QueryCache};
use serde::Serialize;

/// Normalized data plus the cached query results derived from it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cache {
    /// Flat entity store
    pub data: NormalizedStore,
    /// Whole-query results keyed by query id
    pub query_cache: QueryCache,
}

impl Cache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache over existing data, with no cached queries
    pub fn from_data(data: NormalizedStore) -> Self {
        Cache {
            data,
            query_cache: QueryCache::new(),
        }
    }
}

/// Read a cached query result
///
/// A miss (`result == None`) still reports the entry's `modified` flag.
pub fn read_query_from_cache(
    cache: &Cache,
    query_id: &str,
    variables: &Variables,
    allow_modified: bool,
) -> CachedQuery {
    cache.query_cache.read(query_id, variables, allow_modified)
}

/// Drop a query's cached result; no-op if it is not cached
pub fn remove_query_from_cache(cache: &mut Cache, query_id: &str) {
    cache.query_cache.remove(query_id);
}

/// Dirty cached queries touching `updated_ids`, or every query for `None`
///
/// Returns the ids of the queries that were dirtied.
pub fn invalidate_query_cache(
    cache: &mut Cache,
    updated_ids: Option<&UpdatedIds>,
    exclude: &[&str],
) -> Vec<String> {
    cache.query_cache.invalidate(updated_ids, exclude)
}
