//! Shared fixtures for sprocket-core integration tests

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sprocket_core::plugins::{ACTIVE_MARKER, DESCRIPTOR_FILE, ENTRY_FILE};
use sprocket_core::{PluginHost, PluginHostConfig, StaticEntries};
use sprocket_plugin_api::{PluginContext, PluginError};
use tempfile::TempDir;

/// A temporary plugin root
pub struct PluginRoot {
    dir: TempDir,
}

impl PluginRoot {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Start a plugin directory named `name` with an empty descriptor
    pub fn plugin(&self, name: &str) -> PluginBuilder {
        let dir = self.path().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(DESCRIPTOR_FILE), "{}").unwrap();
        PluginBuilder { dir }
    }

    /// Host over this root with sorted discovery
    #[allow(dead_code)]
    pub fn host(&self, entries: StaticEntries) -> PluginHost {
        PluginHost::new(PluginHostConfig::with_plugin_dir(self.path()), entries)
    }
}

pub struct PluginBuilder {
    dir: PathBuf,
}

#[allow(dead_code)]
impl PluginBuilder {
    pub fn descriptor(self, contents: &str) -> Self {
        std::fs::write(self.dir.join(DESCRIPTOR_FILE), contents).unwrap();
        self
    }

    pub fn without_descriptor(self) -> Self {
        std::fs::remove_file(self.dir.join(DESCRIPTOR_FILE)).unwrap();
        self
    }

    pub fn active(self) -> Self {
        std::fs::write(self.dir.join(ACTIVE_MARKER), "").unwrap();
        self
    }

    pub fn entry(self) -> Self {
        std::fs::write(self.dir.join(ENTRY_FILE), "").unwrap();
        self
    }
}

/// Shared log that entries and handlers append to
#[allow(dead_code)]
pub type Trace = Arc<Mutex<Vec<String>>>;

#[allow(dead_code)]
pub fn trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

/// Entry that records `name` in `trace` each time it runs
#[allow(dead_code)]
pub fn recording_entry(
    name: &'static str,
    trace: &Trace,
) -> impl Fn(&mut PluginContext<'_>) -> Result<(), PluginError> + Send + Sync + 'static {
    let trace = Arc::clone(trace);
    move |_ctx: &mut PluginContext<'_>| -> Result<(), PluginError> {
        trace.lock().unwrap().push(name.to_string());
        Ok(())
    }
}
