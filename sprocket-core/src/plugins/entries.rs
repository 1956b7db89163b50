//! Entry resolution - turning a `plugin-entry` file into runnable code
//!
//! Native code can't be compiled from source at runtime, so the entry file
//! only marks that a plugin has entry code. A resolver then supplies the
//! code itself, either from a list compiled into the host or from a shared
//! library installed as the entry file.

use libloading::Library;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use sprocket_plugin_api::{ENTRY_API_VERSION, PluginEntry};

use super::error::PluginHostError;

/// Produces the entry code of a plugin.
pub trait EntryResolver {
    /// Resolve the entry of plugin `name`, whose entry file is `entry_path`
    fn resolve(
        &mut self,
        name: &str,
        entry_path: &Path,
    ) -> Result<Arc<dyn PluginEntry>, PluginHostError>;
}

/// Entries registered at build time, keyed by plugin name.
///
/// # Example
///
/// ```
/// use sprocket_core::plugins::StaticEntries;
/// use sprocket_plugin_api::{PluginContext, PluginError};
///
/// let entries = StaticEntries::new().with("hello", |ctx: &mut PluginContext<'_>| {
///     ctx.add_event_handler("greet", |_event, _params| Ok(()));
///     Ok::<(), PluginError>(())
/// });
/// assert!(entries.contains("hello"));
/// ```
#[derive(Default)]
pub struct StaticEntries {
    entries: HashMap<String, Arc<dyn PluginEntry>>,
}

impl StaticEntries {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the entry of plugin `name`, replacing any previous one
    pub fn register(&mut self, name: impl Into<String>, entry: impl PluginEntry + 'static) {
        self.entries.insert(name.into(), Arc::new(entry));
    }

    /// Builder form of [`StaticEntries::register`]
    pub fn with(mut self, name: impl Into<String>, entry: impl PluginEntry + 'static) -> Self {
        self.register(name, entry);
        self
    }

    /// Whether an entry is registered for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl EntryResolver for StaticEntries {
    fn resolve(
        &mut self,
        name: &str,
        entry_path: &Path,
    ) -> Result<Arc<dyn PluginEntry>, PluginHostError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| PluginHostError::EntryNotRegistered {
                name: name.to_string(),
                path: entry_path.to_path_buf(),
            })
    }
}

/// Entries loaded from shared libraries built with `export_entry!`.
///
/// Libraries stay loaded for as long as the resolver lives, since the
/// handlers they register point into them. Host and plugin must be built
/// with the same compiler.
#[derive(Default)]
pub struct DynamicEntries {
    libraries: Vec<Library>,
}

impl DynamicEntries {
    /// Create a resolver with no libraries loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of libraries currently held open
    pub fn library_count(&self) -> usize {
        self.libraries.len()
    }
}

impl EntryResolver for DynamicEntries {
    fn resolve(
        &mut self,
        name: &str,
        entry_path: &Path,
    ) -> Result<Arc<dyn PluginEntry>, PluginHostError> {
        // SAFETY: We're loading a plugin that the user explicitly activated.
        // The library is expected to follow the export_entry! contract.
        let library = unsafe { Library::new(entry_path)? };

        // SAFETY: We're calling a C function exported by the plugin.
        let api_version_fn: libloading::Symbol<extern "C" fn() -> u32> =
            unsafe { library.get(b"_sprocket_entry_api_version")? };

        let found = api_version_fn();
        if found != ENTRY_API_VERSION {
            return Err(PluginHostError::ApiVersionMismatch {
                expected: ENTRY_API_VERSION,
                found,
            });
        }

        // SAFETY: The create function returns a pointer from Box::into_raw,
        // which we take back ownership of here.
        let create_fn: libloading::Symbol<extern "C" fn() -> *mut dyn PluginEntry> =
            unsafe { library.get(b"_sprocket_entry_create")? };
        let entry: Box<dyn PluginEntry> = unsafe { Box::from_raw(create_fn()) };

        tracing::debug!(plugin = %name, path = %entry_path.display(), "Entry library loaded");
        self.libraries.push(library);
        Ok(Arc::from(entry))
    }
}
