//! Flat store -> result tree
//!
//! Reads a result back out of the store by walking the same selection set
//! that wrote it. References are followed by id lookup; generated and stable
//! ids are treated alike.

use graphcache_core::{Error, NormalizedStore, ObjectMap, Result, StoreValue, Value, Variables};
use graphcache_document::{should_include, storage_key, FragmentMap, Selection, SelectionSet};
use std::sync::Arc;

/// Denormalize the record `root_id` through `selection_set`
///
/// # Errors
///
/// `MissingField` if a selected field (or the record itself) is not in the
/// store, `UnknownFragment` for an unresolvable spread.
pub fn read_selection_set_from_store(
    store: &NormalizedStore,
    root_id: &str,
    selection_set: &SelectionSet,
    variables: &Variables,
    fragments: &FragmentMap<'_>,
) -> Result<Value> {
    let reader = Reader {
        store,
        variables,
        fragments,
    };
    let mut out = ObjectMap::new();
    reader.read_into(&mut out, root_id, selection_set)?;
    Ok(Value::Object(Arc::new(out)))
}

struct Reader<'r> {
    store: &'r NormalizedStore,
    variables: &'r Variables,
    fragments: &'r FragmentMap<'r>,
}

impl Reader<'_> {
    fn read_into(&self, out: &mut ObjectMap, id: &str, selection_set: &SelectionSet) -> Result<()> {
        for selection in &selection_set.selections {
            if !should_include(selection, self.variables)? {
                continue;
            }

            match selection {
                Selection::Field(field) => {
                    let key = storage_key(field, self.variables);
                    let stored = self.store.field(id, &key).ok_or_else(|| Error::MissingField {
                        id: id.to_string(),
                        field: key.clone(),
                    })?;
                    let value = self.read_value(stored, field.selection_set.as_ref())?;
                    let result_key = field.result_key();
                    let value = match out.shift_remove(result_key) {
                        Some(existing) => combine(existing, value),
                        None => value,
                    };
                    out.insert(result_key.to_string(), value);
                }
                Selection::InlineFragment(fragment) => {
                    self.read_into(out, id, &fragment.selection_set)?;
                }
                Selection::FragmentSpread(spread) => {
                    let fragment = self.fragments.resolve(&spread.name)?;
                    self.read_into(out, id, &fragment.selection_set)?;
                }
            }
        }
        Ok(())
    }

    fn read_value(&self, stored: &StoreValue, selection_set: Option<&SelectionSet>) -> Result<Value> {
        Ok(match stored {
            StoreValue::Scalar(value) | StoreValue::Json(value) => value.clone(),
            StoreValue::Reference(reference) => {
                let mut nested = ObjectMap::new();
                if let Some(selection_set) = selection_set {
                    self.read_into(&mut nested, &reference.id, selection_set)?;
                }
                Value::Object(Arc::new(nested))
            }
            StoreValue::List(items) => Value::array(
                items
                    .iter()
                    .map(|item| self.read_value(item, selection_set))
                    .collect::<Result<Vec<_>>>()?,
            ),
        })
    }
}

/// Combine two reads of the same result key, as when a field is selected
/// both directly and through a fragment
fn combine(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        (Value::Object(left), Value::Object(right)) => {
            let mut merged = ObjectMap::clone(&left);
            for (key, value) in right.iter() {
                let value = match merged.shift_remove(key) {
                    Some(previous) => combine(previous, value.clone()),
                    None => value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(Arc::new(merged))
        }
        (Value::Array(left), Value::Array(right)) if left.len() == right.len() => Value::array(
            left.iter()
                .zip(right.iter())
                .map(|(l, r)| combine(l.clone(), r.clone()))
                .collect(),
        ),
        (_, incoming) => incoming,
    }
}
