//! sprocket-core: directory-based plugins with synchronous event dispatch
//!
//! A host application points a [`PluginHost`] at a plugin root, calls
//! [`PluginHost::load_plugins`] once at startup, and fires named events
//! whenever it wants plugins to weigh in:
//!
//! ```text
//! startup:  load_plugins() ──▶ entry code ──▶ add_event_handler("render", ..)
//! later:    fire_event("render", &mut params) ──▶ handler 1 ──▶ handler 2 ──▶ caller reads params
//! ```
//!
//! Everything is single-threaded and synchronous. Plugin state lives on
//! disk as marker files; see [`plugins`] for the layout.

pub mod plugins;

pub use plugins::{
    DynamicEntries, EntryResolver, PluginHost, PluginHostConfig, PluginHostError, PluginInfo,
    PluginRegistry, PluginStore, StaticEntries,
};
pub use sprocket_plugin_api::{EventBus, EventHandler, EventParams, PluginDescriptor, PluginError};
