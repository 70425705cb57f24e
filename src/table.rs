//! String tables: key -> template text
//!
//! A table is filled before resolution starts and only read afterwards.
//! [`MemoryTable`] can also be loaded from a TOML file:
//!
//! ```toml
//! [metadata]
//! language = "en-US"
//!
//! [resolver]
//! max_depth = 10
//!
//! [strings]
//! Greeting = "Hello {0}!"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::config::ResolverConfig;

/// Errors that can occur when loading a string table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read string table file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse string table TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Read-only key -> template lookup, shareable between threads
pub trait StringTable: Sync {
    /// Get the template text stored under `key`
    fn get(&self, key: &str) -> Option<&str>;

    /// Check if the table has an entry for `key`
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl StringTable for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(|s| s.as_str())
    }
}

/// An in-memory string table
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    /// Language tag of the entries, if known. Descriptive only; numbers are
    /// always formatted invariant-culture.
    pub language: Option<String>,
    /// Optional description
    pub description: Option<String>,
    entries: HashMap<String, String>,
    resolver: ResolverConfig,
}

/// TOML structure for deserializing string tables
#[derive(Deserialize)]
struct TomlTable {
    metadata: Option<TomlMetadata>,
    resolver: Option<ResolverConfig>,
    #[serde(default)]
    strings: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    language: Option<String>,
    description: Option<String>,
}

impl MemoryTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a table from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, TableError> {
        let parsed: TomlTable = toml::from_str(content)?;

        Ok(MemoryTable {
            language: parsed.metadata.as_ref().and_then(|m| m.language.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            entries: parsed.strings,
            resolver: parsed.resolver.unwrap_or_default(),
        })
    }

    /// Add or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    /// Builder form of [`MemoryTable::insert`]
    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    /// Resolver settings from the `[resolver]` section, defaults when absent
    pub fn resolver_config(&self) -> &ResolverConfig {
        &self.resolver
    }

    /// All keys in the table
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StringTable for MemoryTable {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = MemoryTable::new();
        for (key, template) in iter {
            table.insert(key, template);
        }
        table
    }
}
