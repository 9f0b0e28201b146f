//! Named fragment lookup

use crate::ast::FragmentDefinition;
use graphcache_core::{Error, Result};
use rustc_hash::FxHashMap;

/// Fragment definitions by name, borrowed from their documents
#[derive(Debug, Clone, Default)]
pub struct FragmentMap<'a> {
    fragments: FxHashMap<&'a str, &'a FragmentDefinition>,
}

impl<'a> FragmentMap<'a> {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Index definitions by name; later definitions shadow earlier ones
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = &'a FragmentDefinition>,
    {
        FragmentMap {
            fragments: definitions
                .into_iter()
                .map(|fragment| (fragment.name.as_str(), fragment))
                .collect(),
        }
    }

    /// Look up a fragment by name
    pub fn get(&self, name: &str) -> Option<&'a FragmentDefinition> {
        self.fragments.get(name).copied()
    }

    /// Look up a fragment by name, failing with `UnknownFragment`
    pub fn resolve(&self, name: &str) -> Result<&'a FragmentDefinition> {
        self.get(name).ok_or_else(|| Error::UnknownFragment {
            name: name.to_string(),
        })
    }

    /// Number of fragments
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if no fragments are known
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
