//! Default directory locations for sprocket.
//!
//! Hosts normally pass an explicit plugin root, but when they don't the
//! XDG config layout is used so plugins live next to other tool config.

use std::path::PathBuf;

/// Environment variable that overrides the plugin root outright.
pub const PLUGIN_DIR_ENV: &str = "SPROCKET_PLUGIN_DIR";

/// Get the sprocket config directory.
///
/// Returns `$XDG_CONFIG_HOME/sprocket` if set, otherwise `~/.config/sprocket`.
///
/// # Examples
///
/// ```
/// use sprocket_paths::config_dir;
///
/// let config = config_dir();
/// let host_config = config.join("host.toml");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("sprocket")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/sprocket")
    } else {
        PathBuf::from(".config/sprocket")
    }
}

/// Get the plugin root directory.
///
/// `$SPROCKET_PLUGIN_DIR` wins when set and non-empty; otherwise this is
/// `config_dir()/plugins`. Every subdirectory of the root is a candidate
/// plugin.
///
/// # Examples
///
/// ```
/// use sprocket_paths::plugin_dir;
///
/// let root = plugin_dir();
/// let descriptor = root.join("hello").join("plugin-descriptor");
/// ```
pub fn plugin_dir() -> PathBuf {
    match std::env::var(PLUGIN_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => config_dir().join("plugins"),
    }
}
