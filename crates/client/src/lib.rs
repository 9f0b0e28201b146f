//! graphcache client surface
//!
//! The entry points the rest of a graph-query client calls:
//! - write_query_to_store / write_result_to_store: normalize and cache a result
//! - replace_query_results: overwrite a query's result locally
//! - read_query_from_cache: serve a cached result
//! - GraphCache: owned handle applying a [`CacheConfig`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod handle;
pub mod write;

pub use cache::{invalidate_query_cache, read_query_from_cache, remove_query_from_cache, Cache};
pub use config::{CacheConfig, CONFIG_FILE_NAME};
pub use handle::GraphCache;
pub use write::{
    replace_query_results, write_query_to_store, write_result_to_store, ResultWrite, WriteOutcome,
};

pub use graphcache_core::{
    merge, Error, IdValue, NormalizedStore, QueryCachePointers, Result, StoreObject, StoreValue,
    UpdatedIds, Value, Variables, ROOT_QUERY_ID,
};
pub use graphcache_document::{
    Directive, Document, Field, FragmentDefinition, FragmentMap, FragmentSpread, InlineFragment,
    InputValue, OperationKind, Selection, SelectionSet,
};
pub use graphcache_normalize::{id_field, read_selection_set_from_store, DataIdFn, IdGetter};
pub use graphcache_query_cache::{CachedQuery, QueryCache, QueryCacheEntry};
