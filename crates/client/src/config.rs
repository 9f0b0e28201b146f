//! Cache configuration via `graphcache.toml`

use graphcache_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "graphcache.toml";

/// Behaviour switches of a [`GraphCache`](crate::GraphCache)
///
/// # Example
///
/// ```toml
/// query_cache = true
/// clone_results = false
/// atomic_writes = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maintain the query cache on writes
    #[serde(default = "default_query_cache")]
    pub query_cache: bool,
    /// Deep-clone every incoming result before normalizing it
    #[serde(default)]
    pub clone_results: bool,
    /// Write to a scratch copy and keep it only if the write succeeds
    #[serde(default)]
    pub atomic_writes: bool,
}

fn default_query_cache() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            query_cache: default_query_cache(),
            clone_results: false,
            atomic_writes: false,
        }
    }
}

impl CacheConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# graphcache configuration
#
# Keep whole query results keyed by query id and dirty them when the
# entities they denote change (default: true)
query_cache = true

# Deep-clone each result before it is normalized and cached, so the cache
# shares no nodes with the caller's copy (default: false)
clone_results = false

# Apply each write to a copy of the cache and swap it in only on success.
# Without this a failed write leaves the records written before the
# failure in place (default: false)
atomic_writes = false
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the text is not valid TOML for this struct.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidConfig` if it cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::InvalidConfig(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
