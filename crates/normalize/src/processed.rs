//! Per-write record of already written (entity, field) pairs
//!
//! The same entity can be reached through the same field node more than once
//! in one result, for example every element of a list pointing at a shared
//! `owner`. Only the first visit normalizes the subtree; later visits emit
//! the reference and nothing else.

use graphcache_document::Field;
use rustc_hash::FxHashSet;
use std::marker::PhantomData;

/// Tracker scoped to one top-level write
///
/// Field nodes are identified by address, so the tracker borrows the
/// document for as long as it lives.
#[derive(Debug, Default)]
pub struct ProcessedFields<'doc> {
    seen: FxHashSet<(String, usize)>,
    skipped: usize,
    _document: PhantomData<&'doc Field>,
}

impl<'doc> ProcessedFields<'doc> {
    /// Empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit of `field` for entity `id`
    ///
    /// Returns `true` on the first visit, `false` if this pair was already
    /// written during the current write.
    pub fn first_visit(&mut self, id: &str, field: &'doc Field) -> bool {
        let token = field as *const Field as usize;
        let first = self.seen.insert((id.to_string(), token));
        if !first {
            self.skipped += 1;
        }
        first
    }

    /// Number of repeated visits that were skipped
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
