//! PluginStore - filesystem-backed plugin state
//!
//! Install and activation state is nothing but file presence:
//!
//! ```text
//! <root>/<name>/plugin-descriptor   installed (JSON metadata)
//! <root>/<name>/active              active (zero-byte marker)
//! <root>/<name>/plugin-entry        has entry code
//! ```
//!
//! All path construction lives here so the convention can be swapped for a
//! real metadata store without touching the loader.

use std::path::{Path, PathBuf};

use sprocket_plugin_api::PluginDescriptor;

use super::error::PluginHostError;

/// Descriptor file name; its presence means "installed"
pub const DESCRIPTOR_FILE: &str = "plugin-descriptor";
/// Marker file name; its presence means "active"
pub const ACTIVE_MARKER: &str = "active";
/// Entry file name; its presence means "has entry code"
pub const ENTRY_FILE: &str = "plugin-entry";

/// Accessor for the plugin directories under one root.
///
/// Name validation is advisory: [`PluginStore::is_valid_name`] exists for
/// callers, but the other operations only enforce it when the store is
/// built with [`PluginStore::strict_names`]. Without that, callers must
/// police names themselves (a name like `../x` escapes the root).
#[derive(Debug, Clone)]
pub struct PluginStore {
    root: PathBuf,
    strict_names: bool,
    strict_descriptors: bool,
}

impl PluginStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            strict_names: false,
            strict_descriptors: false,
        }
    }

    /// Builder: reject invalid names in `load`, `enable` and `disable`
    pub fn strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }

    /// Builder: fail `load` on malformed descriptors instead of returning empty metadata
    pub fn strict_descriptors(mut self, strict: bool) -> Self {
        self.strict_descriptors = strict;
        self
    }

    /// The plugin root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether invalid names are rejected
    pub fn enforces_names(&self) -> bool {
        self.strict_names
    }

    /// Directory of plugin `name`
    pub fn plugin_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// True iff `<root>/<name>/plugin-descriptor` exists
    pub fn is_installed(&self, name: &str) -> bool {
        self.plugin_path(name).join(DESCRIPTOR_FILE).is_file()
    }

    /// True iff `<root>/<name>/active` exists. Does not imply installed.
    pub fn is_active(&self, name: &str) -> bool {
        self.plugin_path(name).join(ACTIVE_MARKER).is_file()
    }

    /// True iff `<root>/<name>/plugin-entry` exists
    pub fn has_entry(&self, name: &str) -> bool {
        self.entry_path(name).is_file()
    }

    /// Path of the entry file of plugin `name`
    pub fn entry_path(&self, name: &str) -> PathBuf {
        self.plugin_path(name).join(ENTRY_FILE)
    }

    /// Check the plugin naming pattern.
    ///
    /// A valid name starts with one or more ASCII letters or hyphens and
    /// continues with ASCII letters, digits or hyphens.
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '-' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
    }

    /// Read the descriptor of plugin `name`.
    ///
    /// Unparsable content yields a descriptor with every field empty, unless
    /// the store was built with `strict_descriptors`.
    pub fn load(&self, name: &str) -> Result<PluginDescriptor, PluginHostError> {
        self.check_name(name)?;
        if !self.is_installed(name) {
            return Err(PluginHostError::NotInstalled {
                name: name.to_string(),
            });
        }

        let contents = std::fs::read(self.plugin_path(name).join(DESCRIPTOR_FILE))?;
        match PluginDescriptor::parse(name, &contents) {
            Ok(descriptor) => Ok(descriptor),
            Err(e) if self.strict_descriptors => Err(PluginHostError::MalformedDescriptor {
                name: name.to_string(),
                reason: e.to_string(),
            }),
            Err(e) => {
                tracing::warn!(plugin = %name, error = %e, "Malformed descriptor, using empty metadata");
                Ok(PluginDescriptor::empty(name))
            }
        }
    }

    /// Create the active marker. No-op if it already exists.
    pub fn enable(&self, name: &str) -> Result<(), PluginHostError> {
        self.check_name(name)?;
        self.require_installed(name)?;

        if !self.is_active(name) {
            std::fs::write(self.plugin_path(name).join(ACTIVE_MARKER), "")?;
            tracing::info!(plugin = %name, "Plugin enabled");
        }
        Ok(())
    }

    /// Remove the active marker. No-op if it does not exist.
    pub fn disable(&self, name: &str) -> Result<(), PluginHostError> {
        self.check_name(name)?;
        self.require_installed(name)?;

        if self.is_active(name) {
            std::fs::remove_file(self.plugin_path(name).join(ACTIVE_MARKER))?;
            tracing::info!(plugin = %name, "Plugin disabled");
        }
        Ok(())
    }

    /// Names of all installed plugins, sorted
    pub fn installed_plugins(&self) -> Result<Vec<String>, PluginHostError> {
        let mut names: Vec<String> = self
            .plugin_dirs()?
            .into_iter()
            .filter(|name| self.is_installed(name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Names of the directories directly under the root, in listing order.
    ///
    /// Listing order is whatever the filesystem returns. A missing root is
    /// an empty listing.
    pub fn plugin_dirs(&self) -> Result<Vec<String>, PluginHostError> {
        if !self.root.exists() {
            tracing::debug!(dir = %self.root.display(), "Plugin directory does not exist");
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => found.push(name),
                Err(raw) => {
                    tracing::debug!(dir = ?raw, "Skipping non UTF-8 plugin directory");
                }
            }
        }
        Ok(found)
    }

    fn check_name(&self, name: &str) -> Result<(), PluginHostError> {
        if self.strict_names && !Self::is_valid_name(name) {
            return Err(PluginHostError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn require_installed(&self, name: &str) -> Result<(), PluginHostError> {
        if self.is_installed(name) {
            Ok(())
        } else {
            Err(PluginHostError::NotInstalled {
                name: name.to_string(),
            })
        }
    }
}
