//! Config defaults: built-in heuristic tables and default section values.

use crate::schema::{
    CopyConfig, CopyFormat, LoggingConfig, NotificationConfig, SelpickConfig, SynthConfig,
};

/// Selector paths longer than this are collapsed.
pub const DEFAULT_MAX_DEPTH: usize = 3;

pub const DEFAULT_MAX_ID_LEN: usize = 20;

pub const DEFAULT_MAX_ATTR_NAME_LEN: usize = 19;

pub const DEFAULT_MAX_ATTR_VALUE_LEN: usize = 34;

pub const DEFAULT_MAX_CLASS_LEN: usize = 30;

pub const DEFAULT_HASH_ID_MIN_DIGITS: usize = 2;

/// Toast lifetime (ms).
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ATTRIBUTE_ALLOWLIST: &[&str] = &["role", "aria-label", "name", "type", "href"];

pub const ATTRIBUTE_ALLOW_PREFIXES: &[&str] = &["data-"];

/// Known-volatile data attributes (loading/error state, lazy sources, handlers).
pub const ATTRIBUTE_DENYLIST: &[&str] = &[
    "data-src",
    "data-action",
    "data-reg",
    "data-error",
    "data-regerror",
    "data-color",
    "data-loading",
];

/// Vue scoped-style markers.
pub const ATTRIBUTE_DENY_PREFIXES: &[&str] = &["data-v-"];

/// Utility-first class names: spacing/sizing prefixes, flex/grid helpers,
/// focus state variants, and anything carrying a number.
pub const ATOMIC_CLASS_PATTERNS: &[&str] = &[
    r"^[whpmbft]-",
    r"^(flex|grid|gap|items|justify)-",
    r"flex",
    r"(?i)focus",
    r"\d",
];

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: SelpickConfig) -> SelpickConfig {
    let config = apply_synth_defaults(config);
    let config = apply_notification_defaults(config);
    let config = apply_copy_defaults(config);
    apply_logging_defaults(config)
}

fn apply_synth_defaults(mut config: SelpickConfig) -> SelpickConfig {
    config.synth.get_or_insert_with(SynthConfig::default);
    config
}

fn apply_notification_defaults(mut config: SelpickConfig) -> SelpickConfig {
    let notification = config
        .notification
        .get_or_insert_with(NotificationConfig::default);
    if notification.ttl_ms.is_none() {
        notification.ttl_ms = Some(DEFAULT_NOTIFICATION_TTL_MS);
    }
    config
}

fn apply_copy_defaults(mut config: SelpickConfig) -> SelpickConfig {
    let copy = config.copy.get_or_insert_with(CopyConfig::default);
    if copy.format.is_none() {
        copy.format = Some(CopyFormat::Selector);
    }
    config
}

fn apply_logging_defaults(mut config: SelpickConfig) -> SelpickConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}
