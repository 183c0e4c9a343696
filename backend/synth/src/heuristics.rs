//! Stability heuristics: which ids, attributes and classes are worth anchoring on.
//!
//! The pattern tables live in [`SynthConfig`]; this module compiles them once
//! and exposes the named predicates the synthesizer relies on.

use once_cell::sync::Lazy;
use regex::RegexSet;
use selpick_config::defaults::ATOMIC_CLASS_PATTERNS;
use selpick_config::SynthConfig;
use selpick_core::SelpickError;

static DEFAULT_ATOMIC_CLASSES: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new(ATOMIC_CLASS_PATTERNS).unwrap());

/// Compiled heuristic tables.
#[derive(Debug, Clone)]
pub struct Heuristics {
    pub max_depth: usize,
    pub max_id_len: usize,
    pub max_attr_name_len: usize,
    pub max_attr_value_len: usize,
    pub max_class_len: usize,
    pub hash_id_min_digits: usize,
    pub positional_fallback: bool,
    attribute_allowlist: Vec<String>,
    attribute_allow_prefixes: Vec<String>,
    attribute_denylist: Vec<String>,
    attribute_deny_prefixes: Vec<String>,
    atomic_classes: RegexSet,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::with_patterns(&SynthConfig::default(), DEFAULT_ATOMIC_CLASSES.clone())
    }
}

impl Heuristics {
    pub fn from_config(config: &SynthConfig) -> Result<Self, SelpickError> {
        let atomic_classes = RegexSet::new(&config.atomic_class_patterns)
            .map_err(|e| SelpickError::Config(format!("atomic class pattern: {e}")))?;
        Ok(Self::with_patterns(config, atomic_classes))
    }

    fn with_patterns(config: &SynthConfig, atomic_classes: RegexSet) -> Self {
        Self {
            max_depth: config.max_depth,
            max_id_len: config.max_id_len,
            max_attr_name_len: config.max_attr_name_len,
            max_attr_value_len: config.max_attr_value_len,
            max_class_len: config.max_class_len,
            hash_id_min_digits: config.hash_id_min_digits,
            positional_fallback: config.positional_fallback,
            attribute_allowlist: config.attribute_allowlist.clone(),
            attribute_allow_prefixes: config.attribute_allow_prefixes.clone(),
            attribute_denylist: config.attribute_denylist.clone(),
            attribute_deny_prefixes: config.attribute_deny_prefixes.clone(),
            atomic_classes,
        }
    }

    /// Utility-first class names say nothing about what an element is.
    pub fn is_atomic_class(&self, class: &str) -> bool {
        self.atomic_classes.is_match(class)
    }

    /// Framework-generated ids (`ember123`, `r:1a2b`) carry several digits.
    pub fn is_hash_like_id(&self, id: &str) -> bool {
        id.chars().filter(char::is_ascii_digit).count() >= self.hash_id_min_digits
    }

    /// Whether a class token can serve as a fragment qualifier.
    pub fn accepts_class(&self, class: &str) -> bool {
        !class.is_empty()
            && class.chars().count() <= self.max_class_len
            && !self.is_atomic_class(class)
    }

    /// Whether an attribute can serve as a fragment qualifier.
    ///
    /// Values with digits or whitespace are instance data (ids, counters,
    /// sentences) and are never stable.
    pub fn accepts_attribute(&self, name: &str, value: &str) -> bool {
        if name.chars().any(|c| c.is_ascii_digit())
            || value.chars().any(|c| c.is_ascii_digit() || c.is_whitespace())
            || name.chars().count() > self.max_attr_name_len
            || value.chars().count() > self.max_attr_value_len
        {
            return false;
        }

        if self.attribute_denylist.iter().any(|denied| denied == name)
            || self
                .attribute_deny_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
        {
            return false;
        }

        self.attribute_allowlist.iter().any(|allowed| allowed == name)
            || self
                .attribute_allow_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Whether an id can qualify a path fragment (the id fast path skips the length bound).
    pub fn accepts_path_id(&self, id: &str) -> bool {
        !id.is_empty() && id.chars().count() <= self.max_id_len && !self.is_hash_like_id(id)
    }
}
