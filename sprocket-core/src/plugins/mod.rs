//! Plugin system for sprocket
//!
//! - [`PluginStore`]: install/activation state, stored as files
//! - [`PluginRegistry`]: which plugins have been loaded this process
//! - [`EntryResolver`]: supplies plugin entry code ([`StaticEntries`], [`DynamicEntries`])
//! - [`PluginHost`]: loads plugins and dispatches events to their handlers
//! - [`PluginHostError`]: error types for plugin operations
//!
//! # Plugin Structure
//!
//! Each plugin is a directory under the plugin root containing:
//! - `plugin-descriptor` - JSON metadata; makes the plugin "installed"
//! - `active` (optional) - empty marker; makes the plugin "active"
//! - `plugin-entry` (optional) - entry code, run once when active
//!
//! # Example
//!
//! ```no_run
//! use sprocket_core::plugins::{PluginHost, PluginHostConfig, StaticEntries};
//! use sprocket_plugin_api::{EventParams, PluginContext, PluginError};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let entries = StaticEntries::new().with(
//!     "testplugin",
//!     |ctx: &mut PluginContext<'_>| -> Result<(), PluginError> {
//!         ctx.add_event_handler("test", |_event, params| {
//!             params.insert("foo".into(), "bar".into());
//!             Ok(())
//!         });
//!         Ok(())
//!     },
//! );
//!
//! let mut host = PluginHost::new(PluginHostConfig::default(), entries);
//! host.load_plugins()?;
//!
//! let mut params = EventParams::new();
//! params.insert("foo".into(), "foo".into());
//! host.fire_event("test", &mut params)?;
//! # Ok(())
//! # }
//! ```

mod entries;
mod error;
mod host;
mod registry;
mod store;

pub use entries::{DynamicEntries, EntryResolver, StaticEntries};
pub use error::PluginHostError;
pub use host::{PluginHost, PluginHostConfig, PluginInfo};
pub use registry::PluginRegistry;
pub use store::{ACTIVE_MARKER, DESCRIPTOR_FILE, ENTRY_FILE, PluginStore};
