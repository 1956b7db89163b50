//! hello-host - the smallest useful sprocket host
//!
//! Loads plugins from the plugin root, prints the `testplugin` descriptor if
//! it is installed, then fires `test` with `foo = "foo"` and prints what the
//! handlers left behind.
//!
//! ```bash
//! mkdir -p /tmp/plugins/testplugin
//! echo '{"title":"Test Plugin","version":"1.0"}' > /tmp/plugins/testplugin/plugin-descriptor
//! touch /tmp/plugins/testplugin/active /tmp/plugins/testplugin/plugin-entry
//! hello-host --plugin-dir /tmp/plugins      # prints "bar"
//! ```

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;

use sprocket_core::{DynamicEntries, PluginHost, PluginHostConfig, StaticEntries};
use sprocket_plugin_api::{EventParams, PluginContext, PluginError};

#[derive(Parser)]
#[command(name = "hello-host", about = "Load sprocket plugins and fire a test event")]
#[command(version)]
struct Cli {
    /// Plugin root (defaults to the config file value, then $SPROCKET_PLUGIN_DIR)
    #[arg(long)]
    plugin_dir: Option<PathBuf>,

    /// Host config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat plugin-entry files as shared libraries built with export_entry!
    #[arg(long)]
    dynamic: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Built-in entry for `testplugin`: rewrites `foo` to "bar".
fn testplugin_entry(ctx: &mut PluginContext<'_>) -> Result<(), PluginError> {
    ctx.add_event_handler("test", |_event, params| {
        params.insert("foo".into(), json!("bar"));
        Ok(())
    });
    ctx.log_info("registered handler for 'test'");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = cli
        .config
        .unwrap_or_else(|| sprocket_paths::config_dir().join("host.toml"));
    let mut config = PluginHostConfig::load(&config_path)?;
    if let Some(dir) = cli.plugin_dir {
        config.plugin_dir = dir;
    }
    tracing::debug!(dir = %config.plugin_dir.display(), "Using plugin root");

    let mut host = if cli.dynamic {
        PluginHost::new(config, DynamicEntries::new())
    } else {
        PluginHost::new(
            config,
            StaticEntries::new().with("testplugin", testplugin_entry),
        )
    };

    let loaded = host.load_plugins()?;
    tracing::info!(loaded, "Plugins loaded");

    if host.is_installed("testplugin") {
        let descriptor = host.descriptor("testplugin")?;
        println!("{:#?}", descriptor);
    }

    let mut params = EventParams::new();
    params.insert("foo".into(), json!("foo"));
    host.fire_event("test", &mut params)?;

    let foo = params.get("foo").and_then(|v| v.as_str()).unwrap_or_default();
    println!("{}", foo);

    Ok(())
}
