//! PluginContext - what entry code sees while it runs

use std::path::{Path, PathBuf};

use crate::error::PluginError;
use crate::event::{EventBus, EventHandler, EventParams};

/// Plugin's interface to the host while its entry code runs.
///
/// Borrowing the host's [`EventBus`] mutably means handlers can only be
/// registered during the entry call; afterwards the host owns dispatch.
pub struct PluginContext<'a> {
    plugin_name: String,
    plugin_dir: PathBuf,
    events: &'a mut EventBus,
}

impl<'a> PluginContext<'a> {
    /// Create a new plugin context
    pub fn new(plugin_name: String, plugin_dir: PathBuf, events: &'a mut EventBus) -> Self {
        Self {
            plugin_name,
            plugin_dir,
            events,
        }
    }

    /// Get the plugin's directory (for reading bundled data files)
    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    /// Get the plugin's name
    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    // ─── Event Registration ──────────────────────────────────────────

    /// Register a closure against a host event
    ///
    /// # Example
    /// ```ignore
    /// ctx.add_event_handler("test", |_event, params| {
    ///     params.insert("foo".into(), "bar".into());
    ///     Ok(())
    /// });
    /// ```
    pub fn add_event_handler<F>(&mut self, event_name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &mut EventParams) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        let event_name = event_name.into();
        tracing::debug!(plugin = %self.plugin_name, event = %event_name, "Registering handler");
        self.events.add_event_handler(event_name, callback);
    }

    /// Register an existing handler against a host event
    pub fn add_handler(&mut self, event_name: impl Into<String>, handler: EventHandler) {
        let event_name = event_name.into();
        tracing::debug!(plugin = %self.plugin_name, event = %event_name, "Registering handler");
        self.events.add_handler(event_name, handler);
    }

    // ─── Logging ─────────────────────────────────────────────────────

    /// Log an info message
    pub fn log_info(&self, message: &str) {
        tracing::info!(plugin = %self.plugin_name, "{}", message);
    }

    /// Log a warning message
    pub fn log_warn(&self, message: &str) {
        tracing::warn!(plugin = %self.plugin_name, "{}", message);
    }

    /// Log an error message
    pub fn log_error(&self, message: &str) {
        tracing::error!(plugin = %self.plugin_name, "{}", message);
    }

    /// Log a debug message
    pub fn log_debug(&self, message: &str) {
        tracing::debug!(plugin = %self.plugin_name, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_creation() {
        let mut bus = EventBus::new();
        let ctx = PluginContext::new("test".to_string(), PathBuf::from("/tmp/test"), &mut bus);
        assert_eq!(ctx.plugin_name(), "test");
        assert_eq!(ctx.plugin_dir(), Path::new("/tmp/test"));
    }

    #[test]
    fn test_handlers_land_on_host_bus() {
        let mut bus = EventBus::new();
        {
            let mut ctx = PluginContext::new("upper".into(), PathBuf::from("/tmp"), &mut bus);
            ctx.add_event_handler("title", |_event, params| {
                let upper = params
                    .get("title")
                    .and_then(|v| v.as_str())
                    .map(str::to_uppercase)
                    .unwrap_or_default();
                params.insert("title".into(), json!(upper));
                Ok(())
            });
            ctx.add_handler("title", EventHandler::new(|_event, _params| Ok(())));
        }

        assert_eq!(bus.handler_count("title"), 2);

        let mut params = EventParams::new();
        params.insert("title".into(), json!("hello"));
        bus.fire_event("title", &mut params).unwrap();
        assert_eq!(params["title"], "HELLO");
    }
}
