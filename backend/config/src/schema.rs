//! selpick configuration schema.
//!
//! Every top-level section is optional in the YAML file; missing sections are
//! filled in by [`crate::apply_all_defaults`].

use serde::{Deserialize, Serialize};

use crate::defaults;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelpickConfig {
    /// Selector synthesis heuristics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synth: Option<SynthConfig>,

    /// On-page toast settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationConfig>,

    /// Clipboard payload settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<CopyConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

impl SelpickConfig {
    /// Synthesis settings, falling back to the built-in tables.
    pub fn synth(&self) -> SynthConfig {
        self.synth.clone().unwrap_or_default()
    }

    pub fn notification_ttl_ms(&self) -> u64 {
        self.notification
            .as_ref()
            .and_then(|n| n.ttl_ms)
            .unwrap_or(defaults::DEFAULT_NOTIFICATION_TTL_MS)
    }

    pub fn copy_format(&self) -> CopyFormat {
        self.copy
            .as_ref()
            .and_then(|c| c.format)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(defaults::DEFAULT_LOG_LEVEL)
    }
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Heuristic tables and thresholds used by the selector synthesizer.
///
/// Length limits are inclusive maxima: a value of exactly the limit is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthConfig {
    /// Maximum number of fragments in a selector path.
    pub max_depth: usize,
    /// Longest id usable inside a path fragment.
    pub max_id_len: usize,
    pub max_attr_name_len: usize,
    pub max_attr_value_len: usize,
    pub max_class_len: usize,
    /// Ids with at least this many digits are treated as generated hashes.
    pub hash_id_min_digits: usize,
    /// Attribute names always eligible for fragments.
    pub attribute_allowlist: Vec<String>,
    /// Attribute name prefixes eligible for fragments.
    pub attribute_allow_prefixes: Vec<String>,
    /// Attribute names never used, even when allowed by prefix.
    pub attribute_denylist: Vec<String>,
    pub attribute_deny_prefixes: Vec<String>,
    /// Regexes classifying utility ("atomic") class names.
    pub atomic_class_patterns: Vec<String>,
    /// Try `:nth-of-type` fragments when the semantic walk finds nothing unique.
    pub positional_fallback: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            max_depth: defaults::DEFAULT_MAX_DEPTH,
            max_id_len: defaults::DEFAULT_MAX_ID_LEN,
            max_attr_name_len: defaults::DEFAULT_MAX_ATTR_NAME_LEN,
            max_attr_value_len: defaults::DEFAULT_MAX_ATTR_VALUE_LEN,
            max_class_len: defaults::DEFAULT_MAX_CLASS_LEN,
            hash_id_min_digits: defaults::DEFAULT_HASH_ID_MIN_DIGITS,
            attribute_allowlist: to_strings(defaults::ATTRIBUTE_ALLOWLIST),
            attribute_allow_prefixes: to_strings(defaults::ATTRIBUTE_ALLOW_PREFIXES),
            attribute_denylist: to_strings(defaults::ATTRIBUTE_DENYLIST),
            attribute_deny_prefixes: to_strings(defaults::ATTRIBUTE_DENY_PREFIXES),
            atomic_class_patterns: to_strings(defaults::ATOMIC_CLASS_PATTERNS),
            positional_fallback: true,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Notification / copy / logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    /// How long a toast stays on the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<CopyFormat>,
}

/// What lands on the clipboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyFormat {
    /// The bare selector.
    #[default]
    Selector,
    /// A ready-to-paste `document.querySelector(`…`)` expression.
    QuerySelector,
}

impl CopyFormat {
    pub fn render(&self, selector: &str) -> String {
        match self {
            CopyFormat::Selector => selector.to_string(),
            CopyFormat::QuerySelector => format!("document.querySelector(`{selector}`)"),
        }
    }
}

impl std::str::FromStr for CopyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selector" => Ok(CopyFormat::Selector),
            "query_selector" | "querySelector" => Ok(CopyFormat::QuerySelector),
            other => Err(format!("unknown copy format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling NDJSON log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}
