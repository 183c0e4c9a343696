//! `selpick-config`: selpick configuration management.
//!
//! Provides:
//! - Typed config schema (synthesis heuristics, notifications, copy format, logging)
//! - YAML read/write with atomic replacement
//! - Environment variable overrides
//! - Default value application
//! - Schema validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, apply_env_overrides_with};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{
    CopyConfig, CopyFormat, LoggingConfig, NotificationConfig, SelpickConfig, SynthConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load, apply env overrides, apply defaults, and validate a config file.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<SelpickConfig> {
    let config = load_config(path).await?;
    prepare(config)
}

/// Post-load pipeline shared by file and in-memory configs.
pub fn prepare(config: SelpickConfig) -> Result<SelpickConfig> {
    let config = apply_env_overrides(config);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}
