//! Entry points that normalize a result and keep the query cache coherent
//!
//! Each write runs the normalization engine over the cache's store, then
//! either refreshes the written query's own cache entry (when a query id is
//! given) or dirties every cached query touching the changed entities.

use crate::cache::Cache;
use graphcache_core::{Result, UpdatedIds, Value, Variables, ROOT_QUERY_ID};
use graphcache_document::{Document, FragmentMap, SelectionSet};
use graphcache_normalize::{DataIdFn, WriteContext};
use std::fmt;

/// What a write changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Records whose existing fields were overwritten with different data
    pub updated_ids: UpdatedIds,
    /// Cached queries marked dirty by the write
    pub dirtied_queries: Vec<String>,
    /// Repeated (entity, field) visits that were not re-normalized
    pub skipped_writes: usize,
}

/// Options of one write
///
/// ```
/// use graphcache_client::{ResultWrite, Variables};
///
/// let variables = Variables::new();
/// let request = ResultWrite::new().variables(&variables).query_id("1");
/// assert_eq!(request.cache_query_id(), Some("1"));
/// ```
#[derive(Clone)]
pub struct ResultWrite<'a> {
    variables: Option<&'a Variables>,
    data_id_from_object: Option<&'a DataIdFn>,
    query_id: Option<&'a str>,
    modified: bool,
    query_cache: bool,
    clone_result: bool,
}

impl Default for ResultWrite<'_> {
    fn default() -> Self {
        ResultWrite {
            variables: None,
            data_id_from_object: None,
            query_id: None,
            modified: false,
            query_cache: true,
            clone_result: false,
        }
    }
}

impl fmt::Debug for ResultWrite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultWrite")
            .field("variables", &self.variables)
            .field("data_id_from_object", &self.data_id_from_object.is_some())
            .field("query_id", &self.query_id)
            .field("modified", &self.modified)
            .field("query_cache", &self.query_cache)
            .field("clone_result", &self.clone_result)
            .finish()
    }
}

impl<'a> ResultWrite<'a> {
    /// Defaults: no variables, no identity function, no query id
    pub fn new() -> Self {
        Self::default()
    }

    /// Variable bindings of the execution
    pub fn variables(mut self, variables: &'a Variables) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Identity function for stable ids
    pub fn data_id_from_object(mut self, data_id_from_object: &'a DataIdFn) -> Self {
        self.data_id_from_object = Some(data_id_from_object);
        self
    }

    /// Cache the result under `query_id`
    pub fn query_id(mut self, query_id: &'a str) -> Self {
        self.query_id = Some(query_id);
        self
    }

    /// Mark the cached result as a local, unconfirmed update
    pub fn modified(mut self, modified: bool) -> Self {
        self.modified = modified;
        self
    }

    /// Whether to touch the query cache at all
    pub fn query_cache(mut self, enabled: bool) -> Self {
        self.query_cache = enabled;
        self
    }

    /// Deep-clone the result before normalizing it
    pub fn clone_result(mut self, enabled: bool) -> Self {
        self.clone_result = enabled;
        self
    }

    /// Query id the result will be cached under, if any
    pub fn cache_query_id(&self) -> Option<&'a str> {
        self.query_id
    }

    pub(crate) fn has_data_id_from_object(&self) -> bool {
        self.data_id_from_object.is_some()
    }
}

/// Normalize the result of a query document at `ROOT_QUERY`
///
/// Named fragments resolve through `fragment_map`.
///
/// # Errors
///
/// `InvalidDocument` if the document's operation is not a query, plus any
/// error of the normalization engine.
pub fn write_query_to_store(
    cache: &mut Cache,
    document: &Document,
    result: Value,
    fragment_map: &FragmentMap<'_>,
    request: &ResultWrite<'_>,
) -> Result<WriteOutcome> {
    let query = document.query_definition()?;
    write_and_cache(cache, &query.selection_set, fragment_map, ROOT_QUERY_ID, result, request)
}

/// Normalize the result of any operation at `data_id`
///
/// Named fragments resolve through the document's own definitions.
pub fn write_result_to_store(
    cache: &mut Cache,
    document: &Document,
    data_id: &str,
    result: Value,
    request: &ResultWrite<'_>,
) -> Result<WriteOutcome> {
    let operation = document.operation()?;
    let fragment_map = FragmentMap::from_definitions(document.fragment_definitions());
    write_and_cache(cache, &operation.selection_set, &fragment_map, data_id, result, request)
}

/// Replace a query's result with `new_result` and refresh its cache entry
pub fn replace_query_results(
    cache: &mut Cache,
    query_id: &str,
    document: &Document,
    variables: &Variables,
    new_result: Value,
    data_id_from_object: Option<&DataIdFn>,
) -> Result<WriteOutcome> {
    let mut request = ResultWrite::new().variables(variables).query_id(query_id);
    if let Some(data_id_from_object) = data_id_from_object {
        request = request.data_id_from_object(data_id_from_object);
    }
    write_result_to_store(cache, document, ROOT_QUERY_ID, new_result, &request)
}

fn write_and_cache(
    cache: &mut Cache,
    selection_set: &SelectionSet,
    fragment_map: &FragmentMap<'_>,
    data_id: &str,
    result: Value,
    request: &ResultWrite<'_>,
) -> Result<WriteOutcome> {
    let result = if request.clone_result {
        result.deep_clone()
    } else {
        result
    };
    let no_variables = Variables::new();
    let variables = request.variables.unwrap_or(&no_variables);
    let cache_query_id = request.query_id.filter(|_| request.query_cache);

    let summary = WriteContext::new(&mut cache.data, variables, fragment_map)
        .with_data_id_from_object(request.data_id_from_object)
        .collect_pointers(cache_query_id.is_some())
        .write(&result, data_id, selection_set)?;

    let dirtied_queries = match cache_query_id {
        Some(query_id) => cache.query_cache.insert(
            query_id,
            result,
            variables.clone(),
            summary.pointers.unwrap_or_default(),
            &summary.updated_ids,
            request.modified,
        ),
        None if request.query_cache => {
            cache.query_cache.invalidate(Some(&summary.updated_ids), &[])
        }
        None => Vec::new(),
    };

    Ok(WriteOutcome {
        updated_ids: summary.updated_ids,
        dirtied_queries,
        skipped_writes: summary.skipped_writes,
    })
}
