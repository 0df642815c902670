//! Path resolution utilities.

use crate::env;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Get the Promo Sensei base directory (~/.promosensei, or `PROMOSENSEI_HOME`).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(env::vars::PROMOSENSEI_HOME) {
        return Ok(expand_tilde(&home));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".promosensei"))
}

/// Get the main config file path (~/.promosensei/promosensei.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("promosensei.json5"))
}

/// Get the REPL history file path (~/.promosensei/history).
pub fn history_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("history"))
}

/// Index file for a store base path: `{base}.bin`.
pub fn index_file(base: &Path) -> PathBuf {
    with_suffix(base, ".bin")
}

/// Metadata file for a store base path: `{base}_metadata.json`.
pub fn metadata_file(base: &Path) -> PathBuf {
    with_suffix(base, "_metadata.json")
}

/// Append a literal suffix to the final path component.
///
/// Unlike `Path::with_extension`, this never replaces an existing extension,
/// so `data/offers.v2` becomes `data/offers.v2.bin`.
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
