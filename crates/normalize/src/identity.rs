//! Identity resolution for composite values
//!
//! A composite value either carries a *stable* id, supplied by the caller's
//! identity function, or receives a *generated* id derived from its position
//! in the result tree.

use graphcache_core::{generated_id, is_generated_id, Error, IdValue, Result, Value};
use std::sync::Arc;

/// Caller-supplied identity function
///
/// Returns the stable id of a composite value, or `None` (or an empty
/// string) when the value has none.
pub type DataIdFn = dyn Fn(&Value) -> Option<String> + Send + Sync;

/// Shared handle to an identity function
pub type IdGetter = Arc<DataIdFn>;

/// Decide the id a composite value is stored under
///
/// # Arguments
/// * `value` - the composite value being normalized
/// * `seed` - position of the value, `<owner-id>.<storage-key>[.<index>]*`
/// * `data_id_from_object` - optional identity function
///
/// # Errors
///
/// `InvalidIdentity` if the identity function returns an id that starts
/// with the generated-id sentinel.
pub fn resolve_identity(
    value: &Value,
    seed: &str,
    data_id_from_object: Option<&DataIdFn>,
) -> Result<IdValue> {
    if let Some(id) = data_id_from_object
        .and_then(|get_id| get_id(value))
        .filter(|id| !id.is_empty())
    {
        if is_generated_id(&id) {
            return Err(Error::InvalidIdentity { id });
        }
        return Ok(IdValue::stable(id));
    }

    Ok(IdValue::generated(generated_id(seed)))
}

/// Identity function reading a string or integer field of each object
///
/// `id_field("id")` behaves like `obj => obj.id`.
pub fn id_field(field: &'static str) -> IdGetter {
    Arc::new(move |value: &Value| match value.get(field) {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Int(id)) => Some(id.to_string()),
        _ => None,
    })
}
