//! Selector fragments: one compound selector per ancestor level.

use std::fmt;

use selpick_core::{Document, ElementId};

use crate::escape::{escape_ident, quote_attr_value};
use crate::heuristics::Heuristics;

/// A single simple-selector qualifier attached to a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    Id(String),
    Attribute { name: String, value: String },
    Class(String),
    NthOfType(usize),
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Id(id) => write!(f, "#{}", escape_ident(id)),
            Qualifier::Attribute { name, value } if value.is_empty() => {
                write!(f, "[{}]", escape_ident(name))
            }
            Qualifier::Attribute { name, value } => {
                write!(f, "[{}={}]", escape_ident(name), quote_attr_value(value))
            }
            Qualifier::Class(class) => write!(f, ".{}", escape_ident(class)),
            Qualifier::NthOfType(n) => write!(f, ":nth-of-type({n})"),
        }
    }
}

/// A compound selector: optional tag followed by qualifiers, e.g. `button[type="submit"].primary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub tag: Option<String>,
    pub qualifiers: Vec<Qualifier>,
}

impl Fragment {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            qualifiers: Vec::new(),
        }
    }

    /// A bare `#id` fragment with no tag.
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            tag: None,
            qualifiers: vec![Qualifier::Id(id.into())],
        }
    }

    pub fn with(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// Worth keeping when a long path is collapsed: carries a class, a
    /// `data-*` attribute, or a positional index.
    pub fn is_informative(&self) -> bool {
        self.qualifiers.iter().any(|q| match q {
            Qualifier::Class(_) | Qualifier::NthOfType(_) => true,
            Qualifier::Attribute { name, .. } => name.starts_with("data-"),
            Qualifier::Id(_) => false,
        })
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(&escape_ident(tag))?;
        }
        for qualifier in &self.qualifiers {
            write!(f, "{qualifier}")?;
        }
        Ok(())
    }
}

/// Everything the synthesizer may anchor on for one element.
#[derive(Debug, Clone)]
pub(crate) struct NodeProfile {
    tag: String,
    id: Option<Qualifier>,
    /// Shortest rendering first.
    attributes: Vec<Qualifier>,
    /// Shortest rendering first.
    classes: Vec<Qualifier>,
}

impl NodeProfile {
    pub(crate) fn build<D: Document + ?Sized>(
        doc: &D,
        element: ElementId,
        heuristics: &Heuristics,
    ) -> Self {
        let tag = doc.tag_name(element);

        let id = doc
            .attribute(element, "id")
            .filter(|id| heuristics.accepts_path_id(id))
            .map(Qualifier::Id);

        let attributes = doc
            .attributes(element)
            .into_iter()
            .filter(|(name, value)| heuristics.accepts_attribute(name, value))
            .map(|(name, value)| Qualifier::Attribute { name, value })
            .collect();

        let classes = doc
            .classes(element)
            .into_iter()
            .filter(|class| heuristics.accepts_class(class))
            .map(Qualifier::Class)
            .collect();

        let mut classes = shortest_first(classes);
        classes.dedup();

        Self {
            tag,
            id,
            attributes: shortest_first(attributes),
            classes,
        }
    }

    fn fragment(&self, qualifiers: &[&Qualifier]) -> Fragment {
        Fragment {
            tag: Some(self.tag.clone()),
            qualifiers: qualifiers.iter().map(|q| (*q).clone()).collect(),
        }
    }

    /// Candidate fragments in strict priority order: id, single attribute,
    /// single class, attribute pair, attribute + class, class pair.
    pub(crate) fn candidates(&self) -> Vec<Fragment> {
        let mut out = Vec::new();

        if let Some(id) = &self.id {
            out.push(self.fragment(&[id]));
        }
        out.extend(self.attributes.iter().map(|a| self.fragment(&[a])));
        out.extend(self.classes.iter().map(|c| self.fragment(&[c])));
        out.extend(pairs(&self.attributes).map(|(a, b)| self.fragment(&[a, b])));
        for attr in &self.attributes {
            out.extend(self.classes.iter().map(|class| self.fragment(&[attr, class])));
        }
        out.extend(pairs(&self.classes).map(|(a, b)| self.fragment(&[a, b])));

        out
    }

    /// Best-effort fragment when no candidate was unique: tag plus the shortest
    /// attribute and shortest class available.
    pub(crate) fn fallback(&self) -> Fragment {
        let chosen: Vec<&Qualifier> = self
            .attributes
            .first()
            .into_iter()
            .chain(self.classes.first())
            .collect();
        self.fragment(&chosen)
    }
}

/// Sort by rendered length, ties by text so the order never depends on attribute storage order.
fn shortest_first(mut qualifiers: Vec<Qualifier>) -> Vec<Qualifier> {
    qualifiers.sort_by_cached_key(|q| {
        let rendered = q.to_string();
        (rendered.len(), rendered)
    });
    qualifiers
}

fn pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, a)| items[i + 1..].iter().map(move |b| (a, b)))
}
