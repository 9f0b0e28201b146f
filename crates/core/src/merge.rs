//! Structural merge of successive results
//!
//! When a query is written again, its new result is merged against the one
//! already cached. Subtrees that did not change come back as the *old* nodes,
//! so consumers holding the previous result can tell unchanged branches apart
//! with a pointer comparison. Changed branches are rebuilt around the merged
//! children.
//!
//! ## Rules
//!
//! - Identical nodes short-circuit to the old node
//! - Two composites of the same kind merge key by key (arrays by index)
//! - A key present only in the new node is a shape mismatch: that child is
//!   taken from the new result as-is and the old substructure for it is dropped
//! - If every merged child is the old child and the old node has no extra
//!   keys, the old node is returned verbatim
//! - Anything else resolves to the new value

use crate::value::{ObjectMap, Value};
use std::sync::Arc;
use tracing::trace;

/// Merge `new` against `old`, reusing old nodes where nothing changed
pub fn merge(new: &Value, old: &Value) -> Value {
    if new.ptr_eq(old) {
        return old.clone();
    }

    match (new, old) {
        (Value::Object(new_entries), Value::Object(old_entries)) => {
            merge_objects(new, new_entries, old, old_entries)
        }
        (Value::Array(new_items), Value::Array(old_items)) => {
            merge_arrays(new, new_items, old, old_items)
        }
        _ => new.clone(),
    }
}

fn merge_objects(new: &Value, new_entries: &ObjectMap, old: &Value, old_entries: &ObjectMap) -> Value {
    let mut merged = ObjectMap::with_capacity(new_entries.len());
    let mut differs_from_old = false;
    let mut differs_from_new = false;

    for (key, new_child) in new_entries {
        let child = match old_entries.get(key) {
            Some(old_child) => {
                let child = merge(new_child, old_child);
                differs_from_old |= !child.ptr_eq(old_child);
                child
            }
            None => {
                trace!(target: "graphcache::cache", key = %key, "Shape mismatch, keeping new subtree");
                differs_from_old = true;
                new_child.clone()
            }
        };
        differs_from_new |= !child.ptr_eq(new_child);
        merged.insert(key.clone(), child);
    }

    if !differs_from_old && old_entries.len() == new_entries.len() {
        return old.clone();
    }
    if differs_from_new {
        Value::Object(Arc::new(merged))
    } else {
        new.clone()
    }
}

fn merge_arrays(new: &Value, new_items: &[Value], old: &Value, old_items: &[Value]) -> Value {
    let mut merged = Vec::with_capacity(new_items.len());
    let mut differs_from_old = false;
    let mut differs_from_new = false;

    for (index, new_child) in new_items.iter().enumerate() {
        let child = match old_items.get(index) {
            Some(old_child) => {
                let child = merge(new_child, old_child);
                differs_from_old |= !child.ptr_eq(old_child);
                child
            }
            None => {
                differs_from_old = true;
                new_child.clone()
            }
        };
        differs_from_new |= !child.ptr_eq(new_child);
        merged.push(child);
    }

    if !differs_from_old && old_items.len() == new_items.len() {
        return old.clone();
    }
    if differs_from_new {
        Value::array(merged)
    } else {
        new.clone()
    }
}
