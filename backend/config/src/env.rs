//! Environment variable overrides.
//!
//! A handful of settings can be forced from the environment without touching
//! the config file. Unparsable values are skipped with a warning.

use std::collections::HashMap;

use tracing::warn;

use crate::schema::{CopyConfig, CopyFormat, LoggingConfig, NotificationConfig, SelpickConfig};

pub const ENV_LOG_LEVEL: &str = "SELPICK_LOG_LEVEL";
pub const ENV_NOTIFICATION_TTL_MS: &str = "SELPICK_NOTIFICATION_TTL_MS";
pub const ENV_COPY_FORMAT: &str = "SELPICK_COPY_FORMAT";
pub const ENV_MAX_DEPTH: &str = "SELPICK_MAX_DEPTH";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: SelpickConfig) -> SelpickConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: SelpickConfig,
    env: &HashMap<String, String>,
) -> SelpickConfig {
    if let Some(level) = non_empty(env, ENV_LOG_LEVEL) {
        config
            .logging
            .get_or_insert_with(LoggingConfig::default)
            .level = Some(level.to_string());
    }

    if let Some(raw) = non_empty(env, ENV_NOTIFICATION_TTL_MS) {
        match raw.parse::<u64>() {
            Ok(ttl) => {
                config
                    .notification
                    .get_or_insert_with(NotificationConfig::default)
                    .ttl_ms = Some(ttl);
            }
            Err(e) => warn!(var = ENV_NOTIFICATION_TTL_MS, value = raw, error = %e, "Ignoring override"),
        }
    }

    if let Some(raw) = non_empty(env, ENV_COPY_FORMAT) {
        match raw.parse::<CopyFormat>() {
            Ok(format) => {
                config.copy.get_or_insert_with(CopyConfig::default).format = Some(format);
            }
            Err(e) => warn!(var = ENV_COPY_FORMAT, value = raw, error = %e, "Ignoring override"),
        }
    }

    if let Some(raw) = non_empty(env, ENV_MAX_DEPTH) {
        match raw.parse::<usize>() {
            Ok(depth) => {
                let mut synth = config.synth();
                synth.max_depth = depth;
                config.synth = Some(synth);
            }
            Err(e) => warn!(var = ENV_MAX_DEPTH, value = raw, error = %e, "Ignoring override"),
        }
    }

    config
}

fn non_empty<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
}
