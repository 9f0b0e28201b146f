//! Storage field keys
//!
//! Inside a normalized record a field is keyed by its name plus a canonical
//! encoding of its resolved arguments, so `node(id: "a")` and `node(id: "b")`
//! land in different slots. The encoding is JSON with object keys sorted at
//! every level, which makes it independent of argument order.

use crate::ast::Field;
use graphcache_core::{Value, Variables};
use std::collections::BTreeMap;

/// Key a field is stored under inside its owner's record
///
/// `name` for fields without arguments, otherwise `name(<json>)`, e.g.
/// `node({"id":"account1"})`.
pub fn storage_key(field: &Field, variables: &Variables) -> String {
    if field.arguments.is_empty() {
        return field.name.clone();
    }

    let arguments: BTreeMap<&str, serde_json::Value> = field
        .arguments
        .iter()
        .filter_map(|(name, value)| {
            value
                .resolve(variables)
                .map(|resolved| (name.as_str(), canonical_json(&resolved)))
        })
        .collect();
    let mut encoded = serde_json::Map::new();
    for (name, value) in arguments {
        encoded.insert(name.to_string(), value);
    }

    format!("{}({})", field.name, serde_json::Value::Object(encoded))
}

fn canonical_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Object(entries) => {
            let sorted: BTreeMap<&String, &Value> = entries.iter().collect();
            let mut encoded = serde_json::Map::new();
            for (key, entry) in sorted {
                encoded.insert(key.clone(), canonical_json(entry));
            }
            serde_json::Value::Object(encoded)
        }
        Value::Array(items) => serde_json::Value::Array(items.iter().map(canonical_json).collect()),
        scalar => serde_json::Value::from(scalar),
    }
}
