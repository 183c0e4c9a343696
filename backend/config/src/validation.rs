//! Config validation: schema checks with user-friendly error messages.

use crate::schema::SelpickConfig;
use regex::Regex;
use thiserror::Error;

const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &SelpickConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_synth(config, &mut report);
    validate_notification(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_synth(config: &SelpickConfig, report: &mut ValidationReport) {
    let Some(synth) = &config.synth else { return };

    if synth.max_depth < 2 {
        report.error(
            "synth.maxDepth",
            "maxDepth must be >= 2 (a head ancestor and the target)",
        );
    }

    for (path, value) in [
        ("synth.maxIdLen", synth.max_id_len),
        ("synth.maxAttrNameLen", synth.max_attr_name_len),
        ("synth.maxAttrValueLen", synth.max_attr_value_len),
        ("synth.maxClassLen", synth.max_class_len),
    ] {
        if value == 0 {
            report.error(path, "length limit must be > 0");
        }
    }

    if synth.hash_id_min_digits == 0 {
        report.error(
            "synth.hashIdMinDigits",
            "hashIdMinDigits must be >= 1, otherwise every id is rejected",
        );
    }

    for (i, pattern) in synth.atomic_class_patterns.iter().enumerate() {
        if let Err(e) = Regex::new(pattern) {
            report.error(format!("synth.atomicClassPatterns[{i}]"), e.to_string());
        }
    }

    if synth.attribute_allowlist.is_empty() && synth.attribute_allow_prefixes.is_empty() {
        report.warn(
            "synth.attributeAllowlist",
            "No attributes are eligible; selectors will rely on ids and classes only",
        );
    }
}

fn validate_notification(config: &SelpickConfig, report: &mut ValidationReport) {
    let Some(notification) = &config.notification else { return };
    if notification.ttl_ms == Some(0) {
        report.error("notification.ttlMs", "ttlMs must be > 0");
    }
}

fn validate_logging(config: &SelpickConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        let base = level.split(',').next().unwrap_or_default();
        if !KNOWN_LOG_LEVELS.contains(&base) && !base.contains('=') {
            report.warn(
                "logging.level",
                format!("Unknown log level '{level}'; RUST_LOG syntax is passed through as-is"),
            );
        }
    }
}
