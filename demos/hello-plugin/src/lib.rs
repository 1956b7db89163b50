//! Hello Plugin - a dynamically loaded sprocket plugin
//!
//! Registers a `test` handler that rewrites `foo` to "bar", and a `greeting`
//! handler that appends to whatever greeting earlier handlers built.
//!
//! ## Building
//!
//! ```bash
//! cargo build --release
//! ```
//!
//! ## Installing
//!
//! ```bash
//! mkdir -p ~/.config/sprocket/plugins/hello
//! echo '{"title":"Hello","author":"sprocket"}' > ~/.config/sprocket/plugins/hello/plugin-descriptor
//! cp target/release/libhello_plugin.so ~/.config/sprocket/plugins/hello/plugin-entry
//! touch ~/.config/sprocket/plugins/hello/active
//! hello-host --dynamic
//! ```

use serde_json::{Value, json};
use sprocket_plugin_api::{PluginContext, PluginEntry, PluginError, export_entry};

#[derive(Default)]
pub struct HelloEntry;

impl PluginEntry for HelloEntry {
    fn run(&self, ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
        ctx.add_event_handler("test", |_event, params| {
            params.insert("foo".into(), json!("bar"));
            Ok(())
        });

        ctx.add_event_handler("greeting", |_event, params| {
            let greeting = match params.get("greeting") {
                Some(Value::String(s)) => format!("{s}, hello"),
                _ => "hello".to_string(),
            };
            params.insert("greeting".into(), json!(greeting));
            Ok(())
        });

        ctx.log_info("Hello plugin loaded!");
        Ok(())
    }
}

// This macro generates the C ABI entry points for dynamic loading
export_entry!(HelloEntry);
