//! Core types and utilities for graphcache
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: result and variable trees with shared, identity-carrying nodes
//! - StoreValue / IdValue: what a normalized record holds
//! - NormalizedStore: the flat, id-keyed entity store
//! - merge: structural merge that preserves unchanged subtrees
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod merge;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use merge::merge;
pub use store::{
    generated_id, is_generated_id, IdValue, NormalizedStore, QueryCachePointers, StoreObject,
    StoreValue, UpdatedIds, GENERATED_ID_SENTINEL, ROOT_QUERY_ID,
};
pub use value::{ObjectMap, Value, Variables};
