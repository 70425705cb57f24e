//! Configuration for template resolution

use serde::Deserialize;

/// Recursion ceiling used when none is configured
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Deepest `{` nesting allowed inside one expression when none is configured
pub const DEFAULT_MAX_NESTING: usize = 64;

/// Text substituted for a string-table expansion past the ceiling
pub const DEFAULT_RECURSION_SENTINEL: &str = "[RECURSIVE]";

/// Configuration options for the resolver
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deepest nesting level at which a string-table entry is still expanded
    pub max_depth: usize,

    /// Substituted instead of expanding an entry past `max_depth`
    pub recursion_sentinel: String,

    /// Deepest `{` nesting inside a single expression before it is rejected
    pub max_nesting: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            recursion_sentinel: DEFAULT_RECURSION_SENTINEL.to_string(),
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

impl ResolverConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recursion ceiling
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the expression nesting limit
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Set the recursion sentinel
    pub fn with_recursion_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.recursion_sentinel = sentinel.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.recursion_sentinel, "[RECURSIVE]");
        assert_eq!(config.max_nesting, 64);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResolverConfig::new()
            .with_max_depth(3)
            .with_recursion_sentinel("...")
            .with_max_nesting(8);

        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_nesting, 8);
        assert_eq!(config.recursion_sentinel, "...");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ResolverConfig = toml::from_str("max_depth = 4").expect("Should parse");
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.recursion_sentinel, DEFAULT_RECURSION_SENTINEL);
    }
}
