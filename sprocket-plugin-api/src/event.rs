//! Named events and the handlers registered against them.
//!
//! Handlers receive the parameter map by mutable reference. Every handler
//! in a dispatch sees the writes of the handlers before it, and the caller
//! sees the final state once `fire_event` returns. This is how plugins
//! hand results back to the host.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::PluginError;

/// Parameters passed to every handler of one dispatch.
pub type EventParams = serde_json::Map<String, serde_json::Value>;

type HandlerFn = dyn Fn(&str, &mut EventParams) -> Result<(), PluginError> + Send + Sync;

/// A callback registered against an event name.
///
/// Cloning is cheap and yields the same callback, so one handler can be
/// registered several times (it then fires once per registration).
#[derive(Clone)]
pub struct EventHandler {
    callback: Arc<HandlerFn>,
}

impl EventHandler {
    /// Wrap a closure or function as a handler
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&str, &mut EventParams) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the handler
    pub fn call(&self, event_name: &str, params: &mut EventParams) -> Result<(), PluginError> {
        (self.callback)(event_name, params)
    }

    /// Whether two handles point at the same callback
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler").finish_non_exhaustive()
    }
}

/// Event name to ordered handler list.
///
/// There is no removal: once registered, a handler lives as long as the bus.
/// Not synchronized; a host sharing it across threads wraps it in a lock.
#[derive(Debug, Default)]
pub struct EventBus {
    handlers: HashMap<String, Vec<EventHandler>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a closure to the handlers of `event_name`
    ///
    /// # Example
    ///
    /// ```
    /// use sprocket_plugin_api::{EventBus, EventParams};
    /// use serde_json::json;
    ///
    /// let mut bus = EventBus::new();
    /// bus.add_event_handler("title", |_event, params| {
    ///     params.insert("title".into(), json!("Hello, world"));
    ///     Ok(())
    /// });
    ///
    /// let mut params = EventParams::new();
    /// bus.fire_event("title", &mut params).unwrap();
    /// assert_eq!(params["title"], "Hello, world");
    /// ```
    pub fn add_event_handler<F>(&mut self, event_name: impl Into<String>, callback: F)
    where
        F: Fn(&str, &mut EventParams) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        self.add_handler(event_name, EventHandler::new(callback));
    }

    /// Append an existing handler to the handlers of `event_name`
    pub fn add_handler(&mut self, event_name: impl Into<String>, handler: EventHandler) {
        let event_name = event_name.into();
        tracing::trace!(event = %event_name, "Handler registered");
        self.handlers.entry(event_name).or_default().push(handler);
    }

    /// Run every handler of `event_name` in registration order.
    ///
    /// No handlers is a no-op. The first handler error stops the dispatch and
    /// is returned; handlers after it do not run.
    pub fn fire_event(&self, event_name: &str, params: &mut EventParams) -> Result<(), PluginError> {
        let Some(handlers) = self.handlers.get(event_name) else {
            return Ok(());
        };

        tracing::debug!(event = %event_name, handlers = handlers.len(), "Firing event");
        for handler in handlers {
            handler.call(event_name, params)?;
        }
        Ok(())
    }

    /// Number of handlers registered for `event_name`
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers.get(event_name).map_or(0, Vec::len)
    }

    /// Names of all events with at least one handler
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}
