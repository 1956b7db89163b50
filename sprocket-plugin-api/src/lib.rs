//! sprocket-plugin-api - Plugin API for sprocket hosts
//!
//! A plugin is a directory under the host's plugin root. When it is active
//! and has entry code, the host runs that code once at startup. Entry code
//! registers handlers against named events, and the host fires those events
//! whenever it likes, passing a mutable parameter map that handlers may
//! rewrite.
//!
//! # Example
//!
//! ```
//! use sprocket_plugin_api::{EventBus, EventParams, PluginContext, PluginEntry, PluginError};
//! use std::path::PathBuf;
//!
//! #[derive(Default)]
//! pub struct Shout;
//!
//! impl PluginEntry for Shout {
//!     fn run(&self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
//!         ctx.add_event_handler("greeting", |_event, params| {
//!             params.insert("greeting".into(), "HELLO".into());
//!             Ok(())
//!         });
//!         Ok(())
//!     }
//! }
//!
//! let mut bus = EventBus::new();
//! let mut ctx = PluginContext::new("shout".into(), PathBuf::from("plugins/shout"), &mut bus);
//! Shout.run(&mut ctx).unwrap();
//!
//! let mut params = EventParams::new();
//! bus.fire_event("greeting", &mut params).unwrap();
//! assert_eq!(params["greeting"], "HELLO");
//! ```

pub mod context;
pub mod error;
pub mod event;
pub mod types;

pub use context::PluginContext;
pub use error::PluginError;
pub use event::{EventBus, EventHandler, EventParams};
pub use types::PluginDescriptor;

/// Current entry API version. Dynamically loaded entries must match this exactly.
pub const ENTRY_API_VERSION: u32 = 1;

/// A plugin's entry code.
///
/// The host calls `run` exactly once per process, during plugin loading.
/// Anything a plugin wants to do later has to be registered as an event
/// handler here. Plain functions and closures with the same signature
/// implement this trait too.
pub trait PluginEntry: Send + Sync {
    /// Run the entry code
    fn run(&self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError>;
}

impl<F> PluginEntry for F
where
    F: Fn(&mut PluginContext<'_>) -> Result<(), PluginError> + Send + Sync,
{
    fn run(&self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        self(ctx)
    }
}

/// Export an entry type for dynamic loading.
///
/// The plugin crate is built as a `cdylib` and the resulting library is
/// installed as the plugin's `plugin-entry` file. The type must implement
/// [`PluginEntry`] and [`Default`].
///
/// # Usage
///
/// ```ignore
/// sprocket_plugin_api::export_entry!(MyEntry);
/// ```
///
/// # Generated Functions
///
/// - `_sprocket_entry_create()`: Creates a new entry instance
/// - `_sprocket_entry_api_version()`: Returns the API version
/// - `_sprocket_entry_destroy()`: Destroys an entry instance
#[macro_export]
macro_rules! export_entry {
    ($entry_type:ty) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn _sprocket_entry_create() -> *mut dyn $crate::PluginEntry {
            let entry: Box<dyn $crate::PluginEntry> = Box::new(<$entry_type>::default());
            Box::into_raw(entry)
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn _sprocket_entry_api_version() -> u32 {
            $crate::ENTRY_API_VERSION
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn _sprocket_entry_destroy(ptr: *mut dyn $crate::PluginEntry) {
            if !ptr.is_null() {
                unsafe {
                    drop(Box::from_raw(ptr));
                }
            }
        }
    };
}
