// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading the
//! application configuration and the product catalog from files.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{Config, ProductCatalog};

/// Environment variable holding the store base URL.
pub const ENV_STORE_URL: &str = "PRECOS_STORE_URL";

/// Environment variable holding the store API key.
pub const ENV_STORE_KEY: &str = "PRECOS_STORE_KEY";

/// Fill store credentials from the environment when the config file
/// left them empty.
pub fn apply_env(config: &mut Config) {
    if config.store.url.trim().is_empty() {
        if let Ok(url) = std::env::var(ENV_STORE_URL) {
            config.store.url = url;
        }
    }
    if config.store.api_key.trim().is_empty() {
        if let Ok(key) = std::env::var(ENV_STORE_KEY) {
            config.store.api_key = key;
        }
    }
}

/// Load and validate config and catalog from the storage directory.
pub fn load_all(storage_dir: &Path) -> Result<(Config, ProductCatalog)> {
    let mut config = Config::load_or_default(storage_dir.join("config.toml"));
    apply_env(&mut config);
    config.validate()?;

    let catalog = ProductCatalog::load_or_default(storage_dir.join("catalog.toml"));
    catalog
        .validate()
        .map_err(|e| AppError::config(format!("Invalid catalog: {e}")))?;

    Ok((config, catalog))
}
