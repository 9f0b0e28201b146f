//! Folding generated records into stable ones
//!
//! An object first written without a stable id lives under a generated id.
//! When a later write resolves a stable id for the same slot, the generated
//! record is merged into the stable one and removed.

use graphcache_core::{NormalizedStore, StoreObject, StoreValue};
use tracing::debug;

/// Merge the record `generated_key` into `real_key` and delete it
///
/// Fields already on the stable record win. References from the generated
/// record to further generated ids are reconciled against the references
/// at the same keys of the stable record, recursively.
pub fn merge_with_generated(store: &mut NormalizedStore, generated_key: &str, real_key: &str) {
    if generated_key == real_key {
        return;
    }
    let Some(generated) = store.remove(generated_key) else {
        return;
    };

    for (key, value) in generated.iter() {
        let nested = match (value, store.field(real_key, key)) {
            (StoreValue::Reference(stale), Some(StoreValue::Reference(current)))
                if stale.generated && stale.id != current.id =>
            {
                Some((stale.id.clone(), current.id.clone()))
            }
            _ => None,
        };
        if let Some((stale_id, current_id)) = nested {
            merge_with_generated(store, &stale_id, &current_id);
        }
    }

    let mut merged = StoreObject::clone(&generated);
    if let Some(real) = store.get(real_key) {
        if generated.keys().all(|key| real.contains_key(key)) {
            debug!(target: "graphcache::write", generated_key, real_key, "Generated record dropped");
            return;
        }
        merged.extend(real.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
    store.insert(real_key, merged);
    debug!(target: "graphcache::write", generated_key, real_key, "Generated record merged");
}
