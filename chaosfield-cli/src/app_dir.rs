//! Directory where the executable lives. Default settings file and image output
//! are placed next to the binary when no explicit path is given.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default output directory for rendered images and frame sequences.
pub fn images_directory() -> PathBuf {
    exe_directory().join("images")
}

/// Settings file consulted when `--config` is not given.
pub fn default_settings_path() -> PathBuf {
    exe_directory().join("settings.json")
}
