//! Default paths for tickoff state
//!
//! Token files are user-writable by default (no root required):
//! `$XDG_STATE_HOME/tickoff` or `~/.local/state/tickoff`.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the state directory
pub const TICKOFF_STATE_DIR_ENV: &str = "TICKOFF_STATE_DIR";

/// Application subdirectory name
const APP_DIR: &str = "tickoff";

/// Get the default directory for token files.
///
/// Order of precedence:
/// 1. `$TICKOFF_STATE_DIR` environment variable (if set)
/// 2. `$XDG_STATE_HOME/tickoff` (if XDG_STATE_HOME is set)
/// 3. `~/.local/state/tickoff` (fallback)
pub fn default_state_dir() -> PathBuf {
    if let Ok(path) = std::env::var(TICKOFF_STATE_DIR_ENV) {
        return PathBuf::from(path);
    }

    state_dir_without_env()
}

/// Get the state directory without checking TICKOFF_STATE_DIR.
/// Used for default values where the env var is checked separately.
pub fn state_dir_without_env() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("state").join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR)
}

/// Resolve a token name or path to a concrete file path.
///
/// Anything that looks like a path (absolute, or containing a
/// separator) is used as-is. Bare names land in the state directory
/// with a `.json` extension.
pub fn resolve_token_path(name: &str) -> PathBuf {
    let p = Path::new(name);
    if p.is_absolute() || name.contains(std::path::MAIN_SEPARATOR) {
        return p.to_path_buf();
    }

    let mut path = default_state_dir().join(name);
    if path.extension().is_none() {
        path.set_extension("json");
    }
    path
}
