//! Normalization engine for graphcache
//!
//! Flattens a nested result into the id-keyed [`NormalizedStore`]:
//! - identity: stable or generated id per composite value
//! - processed: per-write (entity, field) de-duplication
//! - writer: the recursive write and change detection
//! - reconcile: folding generated records into stable ones
//! - reader: reading a result back out of the store
//!
//! [`NormalizedStore`]: graphcache_core::NormalizedStore

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod identity;
pub mod processed;
pub mod reader;
pub mod reconcile;
pub mod writer;

pub use identity::{id_field, resolve_identity, DataIdFn, IdGetter};
pub use processed::ProcessedFields;
pub use reader::read_selection_set_from_store;
pub use reconcile::merge_with_generated;
pub use writer::{write_selection_set_to_store, WriteContext, WriteSummary};
