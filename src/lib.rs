//! graphcache - normalized entity store and query-result cache
//!
//! graphcache flattens the hierarchical results of graph queries into a flat,
//! id-keyed store of entities, reconciles generated ids with stable ones as
//! they become known, and keeps a cache of whole query results that is dirtied
//! when the entities a result denotes change.
//!
//! # Quick Start
//!
//! ```
//! use graphcache::{id_field, CacheConfig, Document, Field, GraphCache, ResultWrite, Value, Variables};
//!
//! let mut cache = GraphCache::new(CacheConfig::default()).with_id_getter(id_field("id"));
//!
//! // { node(id: "account1") { id name } }
//! let query = Document::query([Field::new("node")
//!     .arg("id", "account1")
//!     .select([Field::new("id"), Field::new("name")])]);
//! let result = Value::from(serde_json::json!({"node": {"id": "account1", "name": "Account 1"}}));
//!
//! cache.write_query(&query, result.clone(), ResultWrite::new().query_id("1"))?;
//!
//! assert!(cache.data().contains("account1"));
//! assert_eq!(cache.read_query("1", &Variables::new(), false).result, Some(result));
//! # Ok::<(), graphcache::Error>(())
//! ```
//!
//! # Architecture
//!
//! Everything goes through the client crate: the free functions
//! ([`write_result_to_store`], [`read_query_from_cache`], ...) work on a
//! [`Cache`] the caller owns, and [`GraphCache`] wraps one together with its
//! [`CacheConfig`] and identity function.

// Re-export the public API from graphcache-client
pub use graphcache_client::*;
