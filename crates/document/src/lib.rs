//! Query document model for graphcache
//!
//! The collaborators normalization consumes but does not own:
//! - Document / SelectionSet / Selection: what was asked for
//! - FragmentMap: named fragment lookup
//! - should_include: `@skip` / `@include` evaluation
//! - storage_key: canonical per-field key inside a record

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod directives;
pub mod fragments;
pub mod keys;

pub use ast::{
    Definition, Directive, Document, Field, FragmentDefinition, FragmentSpread, InlineFragment,
    InputValue, OperationDefinition, OperationKind, Selection, SelectionSet,
};
pub use directives::{directives_allow, should_include};
pub use fragments::FragmentMap;
pub use keys::storage_key;
