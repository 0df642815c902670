//! CLI command implementations.

pub mod config;
pub mod offers;

use anyhow::Context;
use promosensei_core::Config;
use std::path::Path;

/// Load the effective configuration: file (if any), then environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_or_default(path).context("Failed to load configuration")
}
