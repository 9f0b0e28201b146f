//! Query-result cache for graphcache
//!
//! Whole query results keyed by query id. Each entry remembers which entities
//! its result denotes (its *pointers*), so a write that changes one of them
//! can mark the entry dirty without re-reading anything.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod entry;

pub use cache::{CachedQuery, QueryCache};
pub use entry::QueryCacheEntry;
