//! Plugin discovery and loading against a real plugin root

mod common;

use common::{PluginRoot, recording_entry, trace};
use sprocket_core::plugins::DESCRIPTOR_FILE;
use sprocket_core::{PluginHost, PluginHostConfig, PluginHostError, StaticEntries};
use sprocket_plugin_api::{EventParams, PluginContext, PluginError};

#[test]
fn inactive_plugins_are_not_loaded() {
    let root = PluginRoot::new();
    root.plugin("dormant").entry();

    let log = trace();
    let mut host = root.host(StaticEntries::new().with("dormant", recording_entry("dormant", &log)));

    assert!(host.is_installed("dormant"));
    assert!(!host.is_active("dormant"));
    assert_eq!(host.load_plugins().unwrap(), 0);
    assert!(!host.is_loaded("dormant"));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn active_plugin_loads_exactly_once() {
    let root = PluginRoot::new();
    root.plugin("hello").active().entry();

    let log = trace();
    let mut host = root.host(StaticEntries::new().with("hello", recording_entry("hello", &log)));

    assert_eq!(host.load_plugins().unwrap(), 1);
    assert_eq!(host.load_plugins().unwrap(), 0);

    assert!(host.is_loaded("hello"));
    assert_eq!(host.loaded_plugins().collect::<Vec<_>>(), vec!["hello"]);
    assert_eq!(*log.lock().unwrap(), vec!["hello"]);
}

#[test]
fn plugins_without_entry_or_descriptor_are_skipped() {
    let root = PluginRoot::new();
    root.plugin("no-entry").active();
    root.plugin("no-descriptor").without_descriptor().active().entry();
    std::fs::write(root.path().join("loose-file"), "").unwrap();

    let log = trace();
    let entries = StaticEntries::new()
        .with("no-entry", recording_entry("no-entry", &log))
        .with("no-descriptor", recording_entry("no-descriptor", &log));
    let mut host = root.host(entries);

    assert_eq!(host.load_plugins().unwrap(), 0);
    assert!(!host.is_loaded("no-entry"));
    assert!(!host.is_loaded("no-descriptor"));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn sorted_discovery_loads_in_name_order() {
    let root = PluginRoot::new();
    for name in ["charlie", "alpha", "bravo"] {
        root.plugin(name).active().entry();
    }

    let log = trace();
    let entries = StaticEntries::new()
        .with("alpha", recording_entry("alpha", &log))
        .with("bravo", recording_entry("bravo", &log))
        .with("charlie", recording_entry("charlie", &log));
    let mut host = root.host(entries);

    assert_eq!(host.load_plugins().unwrap(), 3);
    assert_eq!(*log.lock().unwrap(), vec!["alpha", "bravo", "charlie"]);
    assert_eq!(
        host.loaded_plugins().collect::<Vec<_>>(),
        vec!["alpha", "bravo", "charlie"]
    );
}

#[test]
fn listing_order_discovery_loads_every_plugin() {
    let root = PluginRoot::new();
    for name in ["charlie", "alpha", "bravo"] {
        root.plugin(name).active().entry();
    }
    root.plugin("delta").entry();

    let log = trace();
    let entries = StaticEntries::new()
        .with("alpha", recording_entry("alpha", &log))
        .with("bravo", recording_entry("bravo", &log))
        .with("charlie", recording_entry("charlie", &log))
        .with("delta", recording_entry("delta", &log));
    let config = PluginHostConfig {
        sorted_discovery: false,
        ..PluginHostConfig::with_plugin_dir(root.path())
    };
    let mut host = PluginHost::new(config, entries);

    assert_eq!(host.load_plugins().unwrap(), 3);
    assert_eq!(host.load_plugins().unwrap(), 0);

    let mut ran = log.lock().unwrap().clone();
    ran.sort();
    assert_eq!(ran, vec!["alpha", "bravo", "charlie"]);

    let mut loaded: Vec<&str> = host.loaded_plugins().collect();
    loaded.sort();
    assert_eq!(loaded, vec!["alpha", "bravo", "charlie"]);
    assert!(!host.is_loaded("delta"));
}

#[test]
fn binary_descriptor_does_not_break_listing() {
    let root = PluginRoot::new();
    root.plugin("good").descriptor(r#"{"title":"Good"}"#);
    root.plugin("binary");
    std::fs::write(
        root.path().join("binary").join(DESCRIPTOR_FILE),
        [0xff, 0xfe, b'{', b'}'],
    )
    .unwrap();

    let host = root.host(StaticEntries::new());
    let plugins = host.list_plugins().unwrap();

    assert_eq!(plugins.len(), 2);
    assert_eq!(plugins[0].name, "binary");
    assert_eq!(plugins[0].descriptor.title, "");
    assert_eq!(plugins[1].descriptor.title, "Good");
}

#[test]
fn failing_entry_aborts_remaining_scan() {
    let root = PluginRoot::new();
    for name in ["alpha", "broken", "zulu"] {
        root.plugin(name).active().entry();
    }

    let log = trace();
    let entries = StaticEntries::new()
        .with("alpha", recording_entry("alpha", &log))
        .with(
            "broken",
            |_ctx: &mut PluginContext<'_>| -> Result<(), PluginError> {
                Err(PluginError::custom("cannot start"))
            },
        )
        .with("zulu", recording_entry("zulu", &log));
    let mut host = root.host(entries);

    let err = host.load_plugins().unwrap_err();
    assert!(matches!(err, PluginHostError::EntryFailed { ref name, .. } if name == "broken"));

    assert!(host.is_loaded("alpha"));
    // recorded before its entry ran
    assert!(host.is_loaded("broken"));
    assert!(!host.is_loaded("zulu"));
    assert_eq!(*log.lock().unwrap(), vec!["alpha"]);
}

#[test]
fn panicking_entry_is_reported() {
    let root = PluginRoot::new();
    root.plugin("explodes").active().entry();

    let entries = StaticEntries::new().with(
        "explodes",
        |_ctx: &mut PluginContext<'_>| -> Result<(), PluginError> { panic!("kaboom") },
    );
    let mut host = root.host(entries);

    let err = host.load_plugins().unwrap_err();
    assert!(matches!(err, PluginHostError::EntryPanicked { ref name } if name == "explodes"));
}

#[test]
fn unregistered_entry_aborts_scan() {
    let root = PluginRoot::new();
    root.plugin("mystery").active().entry();

    let mut host = root.host(StaticEntries::new());

    let err = host.load_plugins().unwrap_err();
    assert!(matches!(err, PluginHostError::EntryNotRegistered { ref name, .. } if name == "mystery"));
}

#[test]
fn enable_then_load_picks_plugin_up() {
    let root = PluginRoot::new();
    root.plugin("late").entry();

    let log = trace();
    let mut host = root.host(StaticEntries::new().with("late", recording_entry("late", &log)));

    assert_eq!(host.load_plugins().unwrap(), 0);

    host.enable("late").unwrap();
    host.enable("late").unwrap();
    assert!(host.is_active("late"));

    assert_eq!(host.load_plugins().unwrap(), 1);
    assert!(host.is_loaded("late"));

    host.disable("late").unwrap();
    assert!(!host.is_active("late"));
    // loaded set never shrinks
    assert!(host.is_loaded("late"));
}

#[test]
fn strict_names_skip_invalid_directories() {
    let root = PluginRoot::new();
    root.plugin("9lives").active().entry();
    root.plugin("fine").active().entry();

    let log = trace();
    let entries = StaticEntries::new()
        .with("9lives", recording_entry("9lives", &log))
        .with("fine", recording_entry("fine", &log));
    let config = PluginHostConfig {
        strict_names: true,
        ..PluginHostConfig::with_plugin_dir(root.path())
    };
    let mut host = PluginHost::new(config, entries);

    assert_eq!(host.load_plugins().unwrap(), 1);
    assert_eq!(*log.lock().unwrap(), vec!["fine"]);
}

#[test]
fn entry_sees_its_own_name_and_directory() {
    let root = PluginRoot::new();
    root.plugin("introspect").active().entry();

    let expected_dir = root.path().join("introspect");
    let entries = StaticEntries::new().with(
        "introspect",
        move |ctx: &mut PluginContext<'_>| -> Result<(), PluginError> {
            if ctx.plugin_name() != "introspect" || ctx.plugin_dir() != expected_dir {
                return Err(PluginError::custom("wrong context"));
            }
            Ok(())
        },
    );
    let mut host = root.host(entries);

    assert_eq!(host.load_plugins().unwrap(), 1);
}

#[test]
fn list_plugins_reports_state() {
    let root = PluginRoot::new();
    root.plugin("beta")
        .descriptor(r#"{"title":"Beta","version":"0.2"}"#)
        .active()
        .entry();
    root.plugin("alpha").descriptor("{{ broken");

    let mut host = root.host(StaticEntries::new().with(
        "beta",
        |_ctx: &mut PluginContext<'_>| -> Result<(), PluginError> { Ok(()) },
    ));
    host.load_plugins().unwrap();

    let plugins = host.list_plugins().unwrap();
    assert_eq!(plugins.len(), 2);

    assert_eq!(plugins[0].name, "alpha");
    assert_eq!(plugins[0].descriptor.title, "");
    assert!(!plugins[0].active);
    assert!(!plugins[0].loaded);

    assert_eq!(plugins[1].name, "beta");
    assert_eq!(plugins[1].descriptor.title, "Beta");
    assert_eq!(plugins[1].descriptor.version, "0.2");
    assert!(plugins[1].active);
    assert!(plugins[1].has_entry);
    assert!(plugins[1].loaded);
}

#[test]
fn descriptor_for_missing_plugin_fails() {
    let root = PluginRoot::new();
    let host = root.host(StaticEntries::new());

    let err = host.descriptor("testplugin").unwrap_err();
    assert!(matches!(err, PluginHostError::NotInstalled { .. }));

    let mut params = EventParams::new();
    host.fire_event("never-registered", &mut params).unwrap();
    assert!(params.is_empty());
}
