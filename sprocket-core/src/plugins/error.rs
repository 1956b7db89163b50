//! Plugin host error types

use std::path::PathBuf;
use thiserror::Error;

use sprocket_plugin_api::PluginError;

/// Errors that can occur in the plugin host
#[derive(Error, Debug)]
pub enum PluginHostError {
    /// Plugin has no descriptor file
    #[error("Plugin '{name}' not installed")]
    NotInstalled { name: String },

    /// Descriptor exists but is not a JSON object
    #[error("Malformed descriptor for plugin '{name}': {reason}")]
    MalformedDescriptor { name: String, reason: String },

    /// Name fails the plugin naming pattern
    #[error("Invalid plugin name: '{name}'")]
    InvalidName { name: String },

    /// Entry code returned an error
    #[error("Plugin '{name}' entry failed: {source}")]
    EntryFailed {
        name: String,
        #[source]
        source: PluginError,
    },

    /// Entry code panicked
    #[error("Plugin '{name}' panicked in entry code")]
    EntryPanicked { name: String },

    /// Entry file exists but no resolver can produce its code
    #[error("No entry registered for plugin '{name}' ({path})")]
    EntryNotRegistered { name: String, path: PathBuf },

    /// API version mismatch between host and a dynamically loaded entry
    #[error("API version mismatch: host expects {expected}, plugin has {found}")]
    ApiVersionMismatch { expected: u32, found: u32 },

    /// Failed to load dynamic library
    #[error("Failed to load plugin library: {0}")]
    LibraryLoad(#[from] libloading::Error),

    /// An event handler returned an error
    #[error("Handler for event '{event}' failed: {source}")]
    HandlerFailed {
        event: String,
        #[source]
        source: PluginError,
    },

    /// Host configuration could not be read
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
