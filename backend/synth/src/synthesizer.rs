//! The selector search.
//!
//! Walks from the target toward the root element. At each level the candidate
//! fragments are tried in priority order, either standalone (at the target)
//! or as the new head of the path accumulated so far; the first selector the
//! document reports as unique wins. Levels with no unique candidate contribute
//! their best-effort fragment and the walk moves on to the parent.

use selpick_config::SynthConfig;
use selpick_core::{Document, ElementId, SelpickError};
use tracing::{debug, trace};

use crate::fragment::{Fragment, NodeProfile, Qualifier};
use crate::heuristics::Heuristics;
use crate::path::assemble;

/// Synthesize with the built-in heuristics.
pub fn synthesize<D: Document + ?Sized>(doc: &D, target: ElementId) -> Option<String> {
    Synthesizer::default().synthesize(doc, target)
}

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    heuristics: Heuristics,
}

impl Synthesizer {
    pub fn new(heuristics: Heuristics) -> Self {
        Self { heuristics }
    }

    pub fn from_config(config: &SynthConfig) -> Result<Self, SelpickError> {
        Heuristics::from_config(config).map(Self::new)
    }

    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// A selector matching exactly `target`, or `None` when no unique selector exists.
    pub fn synthesize<D: Document + ?Sized>(&self, doc: &D, target: ElementId) -> Option<String> {
        if target == doc.root() {
            debug!(%target, "Target is the root element; nothing to select");
            return None;
        }

        if let Some(selector) = self.id_shortcut(doc, target) {
            debug!(%target, %selector, "Resolved by id");
            return Some(selector);
        }

        if let Some(selector) = self.semantic_walk(doc, target) {
            debug!(%target, %selector, "Resolved by ancestor walk");
            return Some(selector);
        }

        if self.heuristics.positional_fallback {
            if let Some(selector) = self.positional_walk(doc, target) {
                debug!(%target, %selector, "Resolved by positional walk");
                return Some(selector);
            }
        }

        debug!(%target, "No unique selector");
        None
    }

    /// `#id` alone, when the id does not look generated and is unique.
    fn id_shortcut<D: Document + ?Sized>(&self, doc: &D, target: ElementId) -> Option<String> {
        let id = doc.attribute(target, "id").filter(|id| !id.is_empty())?;
        if self.heuristics.is_hash_like_id(&id) {
            trace!(%id, "Skipping hash-like id");
            return None;
        }
        let selector = Fragment::id(id).to_string();
        doc.is_unique(&selector).then_some(selector)
    }

    fn semantic_walk<D: Document + ?Sized>(&self, doc: &D, target: ElementId) -> Option<String> {
        let root = doc.root();
        let mut path: Vec<Fragment> = Vec::new();
        let mut current = Some(target);

        while let Some(element) = current.filter(|e| *e != root) {
            let profile = NodeProfile::build(doc, element, &self.heuristics);

            for candidate in profile.candidates() {
                if let Some(selector) = self.try_candidate(doc, candidate, &path) {
                    return Some(selector);
                }
            }

            path.insert(0, profile.fallback());
            current = doc.parent(element);
        }

        None
    }

    fn try_candidate<D: Document + ?Sized>(
        &self,
        doc: &D,
        candidate: Fragment,
        path: &[Fragment],
    ) -> Option<String> {
        let selector = if path.is_empty() {
            candidate.to_string()
        } else {
            let mut full = Vec::with_capacity(path.len() + 1);
            full.push(candidate);
            full.extend_from_slice(path);
            assemble(&full, self.heuristics.max_depth)
        };

        trace!(%selector, "Trying candidate");
        doc.is_unique(&selector).then_some(selector)
    }

    /// Last resort: fallback fragments pinned with `:nth-of-type` wherever
    /// siblings share a tag, checked after every level.
    fn positional_walk<D: Document + ?Sized>(&self, doc: &D, target: ElementId) -> Option<String> {
        let root = doc.root();
        let mut path: Vec<Fragment> = Vec::new();
        let mut current = Some(target);

        while let Some(element) = current.filter(|e| *e != root) {
            let mut fragment = NodeProfile::build(doc, element, &self.heuristics).fallback();
            let (index, count) = doc.nth_of_type(element);
            if count > 1 {
                fragment.qualifiers.push(Qualifier::NthOfType(index));
            }
            path.insert(0, fragment);

            let selector = assemble(&path, self.heuristics.max_depth);
            trace!(%selector, "Trying positional path");
            if doc.is_unique(&selector) {
                return Some(selector);
            }
            current = doc.parent(element);
        }

        None
    }
}
