//! # promosensei-core
//!
//! Core types, configuration, and utilities for Promo Sensei.
//!
//! This crate provides shared functionality used across all Promo Sensei crates:
//!
//! - **Offers**: The [`OfferRecord`] type scraped deals are stored as
//! - **Configuration**: Loading, validation, and persistence of the config file
//! - **Utilities**: Path resolution, `.env` handling, and secret strings

pub mod config;
pub mod env;
pub mod error;
pub mod offer;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::Config;
pub use error::ConfigError;
pub use offer::OfferRecord;
pub use secret::SecretString;
