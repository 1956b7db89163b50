//! PluginHost - plugin discovery, loading, and event dispatch

use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use sprocket_plugin_api::{
    EventBus, EventHandler, EventParams, PluginContext, PluginDescriptor, PluginError,
};

use super::entries::EntryResolver;
use super::error::PluginHostError;
use super::registry::PluginRegistry;
use super::store::PluginStore;

/// Configuration for PluginHost
///
/// Every key is optional in the TOML form:
///
/// ```toml
/// plugin_dir = "/srv/app/plugins"
/// sorted_discovery = true
/// strict_names = false
/// strict_descriptors = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginHostConfig {
    /// Plugin root directory
    pub plugin_dir: PathBuf,
    /// Load plugins in name order instead of directory listing order
    pub sorted_discovery: bool,
    /// Reject (or skip, when loading) names that fail the naming pattern
    pub strict_names: bool,
    /// Fail on malformed descriptors instead of using empty metadata
    pub strict_descriptors: bool,
}

impl Default for PluginHostConfig {
    fn default() -> Self {
        Self {
            plugin_dir: sprocket_paths::plugin_dir(),
            sorted_discovery: true,
            strict_names: false,
            strict_descriptors: false,
        }
    }
}

impl PluginHostConfig {
    /// Defaults, with the plugin root set to `plugin_dir`
    pub fn with_plugin_dir(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
            ..Default::default()
        }
    }

    /// Load config from a TOML file
    ///
    /// Returns the defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, PluginHostError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| PluginHostError::Config(e.to_string()))
    }
}

/// Information about an installed plugin
#[derive(Debug, Clone)]
pub struct PluginInfo {
    /// Plugin name
    pub name: String,
    /// Plugin metadata
    pub descriptor: PluginDescriptor,
    /// Whether the active marker is present
    pub active: bool,
    /// Whether the plugin has an entry file
    pub has_entry: bool,
    /// Whether the entry code has run this process
    pub loaded: bool,
}

/// The plugin host owns all plugin state of one application.
///
/// Loaded plugins and registered handlers live here rather than in globals,
/// so every host (and every test) starts clean.
pub struct PluginHost {
    store: PluginStore,
    registry: PluginRegistry,
    events: EventBus,
    entries: Box<dyn EntryResolver>,
    sorted_discovery: bool,
}

impl PluginHost {
    /// Create a new plugin host with the given configuration
    pub fn new(config: PluginHostConfig, entries: impl EntryResolver + 'static) -> Self {
        let store = PluginStore::new(config.plugin_dir)
            .strict_names(config.strict_names)
            .strict_descriptors(config.strict_descriptors);

        Self {
            store,
            registry: PluginRegistry::new(),
            events: EventBus::new(),
            entries: Box::new(entries),
            sorted_discovery: config.sorted_discovery,
        }
    }

    /// Load every installed, active plugin that has an entry file.
    ///
    /// Each plugin's entry code runs once per host; plugins loaded by an
    /// earlier call are skipped. Without `sorted_discovery` the order is
    /// whatever the filesystem lists. The first entry failure aborts the
    /// scan and plugins listed after it are not loaded.
    ///
    /// Returns the number of plugins loaded by this call.
    pub fn load_plugins(&mut self) -> Result<usize, PluginHostError> {
        let mut names = self.store.plugin_dirs()?;
        if self.sorted_discovery {
            names.sort();
        }

        let mut count = 0;
        for name in names {
            if self.store.enforces_names() && !PluginStore::is_valid_name(&name) {
                tracing::debug!(plugin = %name, "Invalid plugin name, skipping");
                continue;
            }
            if !self.store.is_installed(&name) {
                continue;
            }
            if !self.store.is_active(&name) {
                tracing::debug!(plugin = %name, "Plugin inactive, skipping");
                continue;
            }
            if !self.store.has_entry(&name) {
                tracing::debug!(plugin = %name, "Plugin has no entry, skipping");
                continue;
            }
            if !self.registry.record(&name) {
                tracing::debug!(plugin = %name, "Plugin already loaded, skipping");
                continue;
            }

            if let Err(e) = self.run_entry(&name) {
                tracing::error!(plugin = %name, error = %e, "Failed to load plugin");
                return Err(e);
            }
            tracing::info!(plugin = %name, "Plugin loaded");
            count += 1;
        }

        Ok(count)
    }

    /// Resolve and run one plugin's entry code against the host's event bus
    fn run_entry(&mut self, name: &str) -> Result<(), PluginHostError> {
        let entry_path = self.store.entry_path(name);
        let entry = self.entries.resolve(name, &entry_path)?;

        let mut ctx = PluginContext::new(
            name.to_string(),
            self.store.plugin_path(name),
            &mut self.events,
        );

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| entry.run(&mut ctx)));
        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(PluginHostError::EntryFailed {
                name: name.to_string(),
                source,
            }),
            Err(_) => Err(PluginHostError::EntryPanicked {
                name: name.to_string(),
            }),
        }
    }

    // ─── Plugin State ────────────────────────────────────────────────

    /// Check if a plugin is installed
    pub fn is_installed(&self, name: &str) -> bool {
        self.store.is_installed(name)
    }

    /// Check if a plugin is active
    pub fn is_active(&self, name: &str) -> bool {
        self.store.is_active(name)
    }

    /// Check if a plugin's entry code has run
    pub fn is_loaded(&self, name: &str) -> bool {
        self.registry.is_loaded(name)
    }

    /// Check the plugin naming pattern
    pub fn is_valid_name(name: &str) -> bool {
        PluginStore::is_valid_name(name)
    }

    /// Read a plugin's descriptor (fresh from disk on every call)
    pub fn descriptor(&self, name: &str) -> Result<PluginDescriptor, PluginHostError> {
        self.store.load(name)
    }

    /// Activate a plugin. Takes effect at the next `load_plugins`.
    pub fn enable(&self, name: &str) -> Result<(), PluginHostError> {
        self.store.enable(name)
    }

    /// Deactivate a plugin. Handlers it already registered stay registered.
    pub fn disable(&self, name: &str) -> Result<(), PluginHostError> {
        self.store.disable(name)
    }

    /// Names of loaded plugins, in load order
    pub fn loaded_plugins(&self) -> impl Iterator<Item = &str> {
        self.registry.loaded()
    }

    /// Describe every installed plugin, sorted by name
    pub fn list_plugins(&self) -> Result<Vec<PluginInfo>, PluginHostError> {
        self.store
            .installed_plugins()?
            .into_iter()
            .map(|name| -> Result<PluginInfo, PluginHostError> {
                Ok(PluginInfo {
                    descriptor: self.store.load(&name)?,
                    active: self.store.is_active(&name),
                    has_entry: self.store.has_entry(&name),
                    loaded: self.registry.is_loaded(&name),
                    name,
                })
            })
            .collect()
    }

    /// Get read access to the plugin store
    pub fn store(&self) -> &PluginStore {
        &self.store
    }

    // ─── Events ──────────────────────────────────────────────────────

    /// Register a handler from host code
    pub fn add_event_handler<F>(&mut self, event_name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &mut EventParams) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        self.events.add_event_handler(event_name, callback);
    }

    /// Register an existing handler from host code
    pub fn add_handler(&mut self, event_name: impl Into<String>, handler: EventHandler) {
        self.events.add_handler(event_name, handler);
    }

    /// Run every handler of `event_name` in registration order.
    ///
    /// Handlers may rewrite `params`; the caller sees the result. An event
    /// with no handlers is a no-op.
    pub fn fire_event(
        &self,
        event_name: &str,
        params: &mut EventParams,
    ) -> Result<(), PluginHostError> {
        self.events
            .fire_event(event_name, params)
            .map_err(|source| PluginHostError::HandlerFailed {
                event: event_name.to_string(),
                source,
            })
    }

    /// Get read access to the event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }
}
