//! Owned cache handle
//!
//! [`GraphCache`] bundles a [`Cache`], its [`CacheConfig`] and the identity
//! function, and applies the configuration to every write.

use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::write::{write_query_to_store, write_result_to_store, ResultWrite, WriteOutcome};
use graphcache_core::{NormalizedStore, Result, UpdatedIds, Value, Variables, ROOT_QUERY_ID};
use graphcache_document::{Document, FragmentMap};
use graphcache_normalize::{read_selection_set_from_store, IdGetter};
use graphcache_query_cache::CachedQuery;
use std::fmt;
use tracing::debug;

/// A normalized cache with its configuration
///
/// # Example
///
/// ```
/// use graphcache_client::{id_field, CacheConfig, Document, Field, GraphCache, ResultWrite, Value, Variables};
///
/// let mut cache = GraphCache::new(CacheConfig::default()).with_id_getter(id_field("id"));
/// let doc = Document::query([Field::new("me").select([Field::new("id"), Field::new("name")])]);
/// let result = Value::from(serde_json::json!({"me": {"id": "u1", "name": "Ann"}}));
///
/// cache.write_query(&doc, result.clone(), ResultWrite::new().query_id("1")).unwrap();
///
/// let read = cache.read_query("1", &Variables::new(), false);
/// assert_eq!(read.result, Some(result));
/// assert!(cache.data().contains("u1"));
/// ```
#[derive(Clone, Default)]
pub struct GraphCache {
    cache: Cache,
    config: CacheConfig,
    data_id_from_object: Option<IdGetter>,
}

impl fmt::Debug for GraphCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphCache")
            .field("records", &self.cache.data.len())
            .field("queries", &self.cache.query_cache.len())
            .field("config", &self.config)
            .field("data_id_from_object", &self.data_id_from_object.is_some())
            .finish()
    }
}

impl GraphCache {
    /// Empty cache
    pub fn new(config: CacheConfig) -> Self {
        GraphCache {
            cache: Cache::new(),
            config,
            data_id_from_object: None,
        }
    }

    /// Resume from existing state
    pub fn from_cache(cache: Cache, config: CacheConfig) -> Self {
        GraphCache {
            cache,
            config,
            data_id_from_object: None,
        }
    }

    /// Use `get_id` to resolve stable ids
    pub fn with_id_getter(mut self, get_id: IdGetter) -> Self {
        self.data_id_from_object = Some(get_id);
        self
    }

    /// Current state
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Flat entity store
    pub fn data(&self) -> &NormalizedStore {
        &self.cache.data
    }

    /// Active configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Give up the handle, keeping the state
    pub fn into_cache(self) -> Cache {
        self.cache
    }

    /// Normalize the result of a query document at `ROOT_QUERY`
    ///
    /// Fragments resolve through the document's own definitions.
    pub fn write_query(&mut self, document: &Document, result: Value, request: ResultWrite<'_>) -> Result<WriteOutcome> {
        let fragment_map = FragmentMap::from_definitions(document.fragment_definitions());
        let GraphCache {
            cache,
            config,
            data_id_from_object,
        } = self;
        let request = configure(request, config, data_id_from_object.as_ref());
        apply(cache, config.atomic_writes, |cache| {
            write_query_to_store(cache, document, result, &fragment_map, &request)
        })
    }

    /// Normalize the result of any operation at `data_id`
    pub fn write_result(
        &mut self,
        document: &Document,
        data_id: &str,
        result: Value,
        request: ResultWrite<'_>,
    ) -> Result<WriteOutcome> {
        let GraphCache {
            cache,
            config,
            data_id_from_object,
        } = self;
        let request = configure(request, config, data_id_from_object.as_ref());
        apply(cache, config.atomic_writes, |cache| {
            write_result_to_store(cache, document, data_id, result, &request)
        })
    }

    /// Replace a query's result and refresh its cache entry
    pub fn replace_query_results(
        &mut self,
        query_id: &str,
        document: &Document,
        variables: &Variables,
        new_result: Value,
    ) -> Result<WriteOutcome> {
        let request = ResultWrite::new().variables(variables).query_id(query_id);
        self.write_result(document, ROOT_QUERY_ID, new_result, request)
    }

    /// Read a cached query result
    pub fn read_query(&self, query_id: &str, variables: &Variables, allow_modified: bool) -> CachedQuery {
        self.cache.query_cache.read(query_id, variables, allow_modified)
    }

    /// Read a query's result back out of the store
    pub fn read_from_store(&self, document: &Document, variables: &Variables) -> Result<Value> {
        let query = document.query_definition()?;
        let fragment_map = FragmentMap::from_definitions(document.fragment_definitions());
        read_selection_set_from_store(
            &self.cache.data,
            ROOT_QUERY_ID,
            &query.selection_set,
            variables,
            &fragment_map,
        )
    }

    /// Drop a query's cached result
    pub fn remove_query(&mut self, query_id: &str) {
        self.cache.query_cache.remove(query_id);
    }

    /// Dirty cached queries touching `updated_ids`, or every query for `None`
    pub fn invalidate_queries(&mut self, updated_ids: Option<&UpdatedIds>) -> Vec<String> {
        self.cache.query_cache.invalidate(updated_ids, &[])
    }
}

fn configure<'r>(
    request: ResultWrite<'r>,
    config: &CacheConfig,
    data_id_from_object: Option<&'r IdGetter>,
) -> ResultWrite<'r> {
    let request = request
        .query_cache(config.query_cache)
        .clone_result(config.clone_results);
    match data_id_from_object {
        Some(get_id) if !request.has_data_id_from_object() => request.data_id_from_object(get_id.as_ref()),
        _ => request,
    }
}

fn apply<F>(cache: &mut Cache, atomic: bool, write: F) -> Result<WriteOutcome>
where
    F: FnOnce(&mut Cache) -> Result<WriteOutcome>,
{
    if !atomic {
        return write(cache);
    }
    let mut scratch = cache.clone();
    match write(&mut scratch) {
        Ok(outcome) => {
            *cache = scratch;
            Ok(outcome)
        }
        Err(e) => {
            debug!(target: "graphcache::write", error = %e, "Write discarded");
            Err(e)
        }
    }
}
