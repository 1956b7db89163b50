//! Plugin registry - tracks which plugins were loaded this process

use std::collections::HashSet;

/// Names of plugins whose entry code has run, in load order.
///
/// Only grows; a fresh registry means a fresh process.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    order: Vec<String>,
    loaded: HashSet<String>,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a plugin as loaded.
    ///
    /// Returns false if it was already recorded.
    pub fn record(&mut self, name: &str) -> bool {
        if !self.loaded.insert(name.to_string()) {
            return false;
        }
        self.order.push(name.to_string());
        true
    }

    /// Check if a plugin is loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    /// Get iterator over loaded plugins, in load order
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of loaded plugins
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no plugin has been loaded
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_default_is_empty() {
        let registry = PluginRegistry::default();
        assert!(registry.is_empty());
        assert!(!registry.is_loaded("anything"));
    }

    #[test]
    fn test_record_once() {
        let mut registry = PluginRegistry::new();

        assert!(registry.record("analytics"));
        assert!(!registry.record("analytics"));

        assert!(registry.is_loaded("analytics"));
        assert!(!registry.is_loaded("history"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_loaded_keeps_order() {
        let mut registry = PluginRegistry::new();
        registry.record("b");
        registry.record("a");
        registry.record("c");
        registry.record("a");

        let loaded: Vec<&str> = registry.loaded().collect();
        assert_eq!(loaded, vec!["b", "a", "c"]);
    }
}
