//! Result tree -> flat store
//!
//! Walks a result against the selection set that produced it and writes one
//! record per entity. Composite fields become references, lists become
//! lists of references, everything else is stored as a leaf.
//!
//! A single top-level write is driven through [`WriteContext::write`], which
//! returns the ids whose stored data changed and, when requested, the pointer
//! map the query cache uses for invalidation.

use crate::identity::{resolve_identity, DataIdFn};
use crate::processed::ProcessedFields;
use crate::reconcile::merge_with_generated;
use graphcache_core::{
    Error, IdValue, NormalizedStore, QueryCachePointers, Result, StoreValue, UpdatedIds, Value,
    Variables, ROOT_QUERY_ID,
};
use graphcache_document::{should_include, storage_key, Field, FragmentMap, Selection, SelectionSet};
use tracing::{debug, trace};

/// What one top-level write did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSummary {
    /// Records whose existing fields were overwritten with different data
    pub updated_ids: UpdatedIds,
    /// Entity id -> result subtrees denoting it, if collection was enabled
    pub pointers: Option<QueryCachePointers>,
    /// Repeated (entity, field) visits that were not re-normalized
    pub skipped_writes: usize,
}

/// State threaded through one recursive write
///
/// Everything the write borrows lives for `'a`: the store being mutated, the
/// variables, the fragments, and the document whose field nodes key the
/// processed-field tracker.
pub struct WriteContext<'a> {
    store: &'a mut NormalizedStore,
    variables: &'a Variables,
    data_id_from_object: Option<&'a DataIdFn>,
    fragment_map: &'a FragmentMap<'a>,
    processed: ProcessedFields<'a>,
    updated_ids: UpdatedIds,
    pointers: Option<QueryCachePointers>,
}

impl<'a> WriteContext<'a> {
    /// Context without an identity function or pointer collection
    pub fn new(
        store: &'a mut NormalizedStore,
        variables: &'a Variables,
        fragment_map: &'a FragmentMap<'a>,
    ) -> Self {
        WriteContext {
            store,
            variables,
            data_id_from_object: None,
            fragment_map,
            processed: ProcessedFields::new(),
            updated_ids: UpdatedIds::new(),
            pointers: None,
        }
    }

    /// Resolve stable ids with `data_id_from_object`
    pub fn with_data_id_from_object(mut self, data_id_from_object: Option<&'a DataIdFn>) -> Self {
        self.data_id_from_object = data_id_from_object;
        self
    }

    /// Collect the pointer map for the query cache
    pub fn collect_pointers(mut self, enabled: bool) -> Self {
        self.pointers = enabled.then(QueryCachePointers::new);
        self
    }

    /// Normalize `result` under `data_id` and finish the write
    pub fn write(
        mut self,
        result: &Value,
        data_id: &str,
        selection_set: &'a SelectionSet,
    ) -> Result<WriteSummary> {
        write_selection_set_to_store(&mut self, result, data_id, selection_set)?;
        let summary = self.into_summary();
        debug!(
            target: "graphcache::write",
            data_id,
            updated = summary.updated_ids.len(),
            skipped = summary.skipped_writes,
            "Result normalized"
        );
        Ok(summary)
    }

    /// Consume the context, keeping what the write produced
    pub fn into_summary(self) -> WriteSummary {
        WriteSummary {
            updated_ids: self.updated_ids,
            pointers: self.pointers,
            skipped_writes: self.processed.skipped(),
        }
    }

    /// Ids changed so far
    pub fn updated_ids(&self) -> &UpdatedIds {
        &self.updated_ids
    }

    fn record_pointer(&mut self, id: &str, value: &Value) {
        if let Some(pointers) = self.pointers.as_mut() {
            pointers.entry(id.to_string()).or_default().push(value.clone());
        }
    }

    /// Write one field, tracking whether it overwrote different data
    fn store_field(&mut self, data_id: &str, key: String, value: StoreValue) {
        let overwrites = match self.store.field(data_id, &key) {
            Some(existing) if *existing == value => return,
            Some(_) => true,
            None => false,
        };

        if overwrites {
            trace!(target: "graphcache::write", data_id, field = %key, "Field changed");
            if data_id != ROOT_QUERY_ID {
                self.updated_ids.insert(data_id.to_string());
            }
        }
        self.store.set_field(data_id, key, value);
    }

    /// Check the slot a reference is about to replace
    ///
    /// Returns the generated id to fold into `new_ref` if the slot held one.
    fn superseded_generated_id(&self, data_id: &str, key: &str, new_ref: &IdValue) -> Result<Option<String>> {
        let Some(StoreValue::Reference(old_ref)) = self.store.field(data_id, key) else {
            return Ok(None);
        };
        if old_ref.id == new_ref.id {
            return Ok(None);
        }
        if new_ref.generated && !old_ref.generated {
            return Err(Error::IdentityConflict {
                existing_id: old_ref.id.clone(),
            });
        }
        Ok(old_ref.generated.then(|| old_ref.id.clone()))
    }
}

/// Write every included selection of `selection_set` for `result` under `data_id`
pub fn write_selection_set_to_store<'a>(
    ctx: &mut WriteContext<'a>,
    result: &Value,
    data_id: &str,
    selection_set: &'a SelectionSet,
) -> Result<()> {
    for selection in &selection_set.selections {
        if !should_include(selection, ctx.variables)? {
            continue;
        }

        match selection {
            Selection::Field(field) => {
                // Absent differs from null: absent fields are not written
                if let Some(value) = result.get(field.result_key()) {
                    write_field_to_store(ctx, field, value, data_id)?;
                }
            }
            Selection::InlineFragment(fragment) => {
                write_selection_set_to_store(ctx, result, data_id, &fragment.selection_set)?;
            }
            Selection::FragmentSpread(spread) => {
                let fragment = ctx.fragment_map.resolve(&spread.name)?;
                write_selection_set_to_store(ctx, result, data_id, &fragment.selection_set)?;
            }
        }
    }
    Ok(())
}

fn write_field_to_store<'a>(
    ctx: &mut WriteContext<'a>,
    field: &'a Field,
    value: &Value,
    data_id: &str,
) -> Result<()> {
    let key = storage_key(field, ctx.variables);

    let selection_set = match &field.selection_set {
        Some(selection_set) if !value.is_null() => selection_set,
        _ => {
            ctx.store_field(data_id, key, StoreValue::leaf(value));
            return Ok(());
        }
    };

    match value {
        Value::Array(items) => {
            let seed = format!("{data_id}.{key}");
            let list = write_list(ctx, field, items, &seed, selection_set)?;
            ctx.store_field(data_id, key, StoreValue::List(list));
        }
        Value::Object(_) => {
            let seed = format!("{data_id}.{key}");
            let id_value = resolve_identity(value, &seed, ctx.data_id_from_object)?;

            if ctx.processed.first_visit(&id_value.id, field) {
                write_selection_set_to_store(ctx, value, &id_value.id, selection_set)?;
            }

            let generated_key = ctx.superseded_generated_id(data_id, &key, &id_value)?;
            ctx.record_pointer(&id_value.id, value);
            if let Some(generated_key) = generated_key {
                merge_with_generated(ctx.store, &generated_key, &id_value.id);
            }
            ctx.store_field(data_id, key, StoreValue::Reference(id_value));
        }
        _ => ctx.store_field(data_id, key, StoreValue::leaf(value)),
    }
    Ok(())
}

fn write_list<'a>(
    ctx: &mut WriteContext<'a>,
    field: &'a Field,
    items: &[Value],
    seed: &str,
    selection_set: &'a SelectionSet,
) -> Result<Vec<StoreValue>> {
    let mut stored = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let item_seed = format!("{seed}.{index}");
        let stored_item = match item {
            Value::Null => StoreValue::null(),
            Value::Array(nested) => {
                StoreValue::List(write_list(ctx, field, nested, &item_seed, selection_set)?)
            }
            Value::Object(_) => {
                let id_value = resolve_identity(item, &item_seed, ctx.data_id_from_object)?;
                ctx.record_pointer(&id_value.id, item);
                if ctx.processed.first_visit(&id_value.id, field) {
                    write_selection_set_to_store(ctx, item, &id_value.id, selection_set)?;
                }
                StoreValue::Reference(id_value)
            }
            scalar => StoreValue::leaf(scalar),
        };
        stored.push(stored_item);
    }

    Ok(stored)
}
