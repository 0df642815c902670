//! Environment variable handling.

use std::env;
use std::path::Path;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
pub fn get_var_or(name: &str, default: &str) -> String {
    get_var(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable as a usize.
pub fn get_usize(name: &str) -> Option<usize> {
    get_var(name).and_then(|v| v.parse().ok())
}

/// Load environment variables from `.env` in the working directory.
pub fn load_dotenv() -> Result<usize, std::io::Error> {
    load_dotenv_from(Path::new(".env"))
}

/// Load `KEY=value` lines from a file into the process environment.
///
/// Variables that are already set are left alone. Returns how many
/// variables were set.
pub fn load_dotenv_from(path: &Path) -> Result<usize, std::io::Error> {
    if !path.exists() {
        return Ok(0);
    }

    let content = std::fs::read_to_string(path)?;
    let mut loaded = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var(&key).is_err() {
            env::set_var(&key, value);
            loaded += 1;
        }
    }
    Ok(loaded)
}

/// Parse `.env` content into key/value pairs.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Common environment variable names.
pub mod vars {
    /// API key for OpenAI (embeddings and completions).
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

    /// Base URL override for an OpenAI-compatible API.
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

    /// Promo Sensei home directory override.
    pub const PROMOSENSEI_HOME: &str = "PROMOSENSEI_HOME";

    /// Promo Sensei config file override.
    pub const PROMOSENSEI_CONFIG: &str = "PROMOSENSEI_CONFIG";

    /// Vector store base path override.
    pub const PROMOSENSEI_STORE_PATH: &str = "PROMOSENSEI_STORE_PATH";

    /// Promo Sensei log filter.
    pub const PROMOSENSEI_LOG: &str = "PROMOSENSEI_LOG";
}
