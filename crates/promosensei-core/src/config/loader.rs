//! Configuration loading and persistence.

use super::Config;
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use crate::secret::SecretString;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// Resolve the config file path: `PROMOSENSEI_CONFIG`, else the default location.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        match env::get_var(env::vars::PROMOSENSEI_CONFIG) {
            Some(path) => Ok(paths::expand_tilde(&path)),
            None => paths::config_file(),
        }
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Load from `path` (or the default path), falling back to defaults if the file is absent.
    ///
    /// Environment overrides are applied on top in both cases.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let loaded = match path {
            Some(p) => Self::load(p),
            None => Self::load_default(),
        };

        let mut config = match loaded {
            Ok(config) => config,
            Err(ConfigError::NotFound(p)) => {
                tracing::debug!("No config file at {}, using defaults", p.display());
                Self::default()
            }
            Err(e) => return Err(e),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Overlay values from environment variables.
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = SecretString::from_env(env::vars::OPENAI_API_KEY) {
            self.openai.api_key = Some(key);
        }
        if let Some(url) = env::get_var(env::vars::OPENAI_BASE_URL) {
            self.openai.base_url = url;
        }
        if let Some(path) = env::get_var(env::vars::PROMOSENSEI_STORE_PATH) {
            self.store.path = paths::expand_tilde(&path);
        }
    }

    /// The configured API key, if any.
    pub fn api_key(&self) -> Option<&SecretString> {
        self.openai.api_key.as_ref().filter(|k| !k.is_empty())
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path()?;
        self.save(&path)?;
        Ok(path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write atomically
        let temp_path = paths::with_suffix(path, ".tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to a JSON5-compatible string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 has no serializer; plain JSON is valid JSON5.
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.openai.base_url.trim().is_empty() {
            errors.push("OpenAI base_url must not be empty".to_string());
        }

        if self.embeddings.model.trim().is_empty() {
            errors.push("Embedding model must not be empty".to_string());
        }
        if self.embeddings.timeout_secs == 0 {
            errors.push("Embedding timeout_secs must be greater than 0".to_string());
        }

        if self.completion.model.trim().is_empty() {
            errors.push("Completion model must not be empty".to_string());
        }
        if self.completion.max_tokens == 0 {
            errors.push("Completion max_tokens must be greater than 0".to_string());
        }
        if self.completion.timeout_secs == 0 {
            errors.push("Completion timeout_secs must be greater than 0".to_string());
        }

        if self.store.path.as_os_str().is_empty() {
            errors.push("Store path must not be empty".to_string());
        }

        if self.query.search_k == 0 {
            errors.push("Query search_k must be greater than 0".to_string());
        }
        if self.query.summary_k == 0 {
            errors.push("Query summary_k must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
