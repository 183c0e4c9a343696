//! HTML document backed by `scraper`.
//!
//! Elements are indexed once at parse time in document order, so an
//! [`ElementId`] is simply the element's position in a pre-order walk from
//! `<html>`. Queries re-walk the tree to map matches back to those positions.

use std::collections::{HashMap, HashSet};

use scraper::{ElementRef, Html, Selector};
use selpick_core::{Document, ElementId, Point, Rect, SelpickError};
use tracing::debug;

#[derive(Debug, Clone)]
struct ElementRecord {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    depth: usize,
}

/// A parsed, immutable HTML document with optional layout information.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    html: Html,
    elements: Vec<ElementRecord>,
    rects: HashMap<ElementId, Rect>,
    scroll: Point,
}

impl HtmlDocument {
    /// Parse a full document. Missing `<html>`, `<head>` and `<body>` are
    /// synthesized by the parser, as a browser would.
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        let elements = index_elements(&html);
        debug!(elements = elements.len(), "Parsed HTML document");
        Self {
            html,
            elements,
            rects: HashMap::new(),
            scroll: Point::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Resolve a selector that must match exactly one element.
    pub fn find_unique(&self, selector: &str) -> Result<ElementId, SelpickError> {
        let matches = self.query_all(selector)?;
        match matches.as_slice() {
            [only] => Ok(*only),
            _ => Err(SelpickError::InvalidSelector {
                selector: selector.to_string(),
                reason: format!("expected exactly one match, found {}", matches.len()),
            }),
        }
    }

    /// Assign a viewport-relative box to an element.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) -> Result<(), SelpickError> {
        self.record(id)?;
        self.rects.insert(id, rect);
        Ok(())
    }

    pub fn set_scroll_offset(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    fn record(&self, id: ElementId) -> Result<&ElementRecord, SelpickError> {
        self.elements
            .get(id.0)
            .ok_or(SelpickError::UnknownElement(id))
    }
}

fn element_refs(html: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    html.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

fn index_elements(html: &Html) -> Vec<ElementRecord> {
    let mut positions = HashMap::new();
    let mut elements: Vec<ElementRecord> = Vec::new();

    for element in element_refs(html) {
        let id = ElementId(elements.len());
        positions.insert(element.id(), id);

        let parent = element
            .parent()
            .and_then(|node| positions.get(&node.id()).copied());
        let depth = parent.map_or(0, |p| elements[p.0].depth + 1);
        if let Some(parent) = parent {
            elements[parent.0].children.push(id);
        }

        let value = element.value();
        elements.push(ElementRecord {
            tag: value.name().to_ascii_lowercase(),
            attributes: value
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            parent,
            children: Vec::new(),
            depth,
        });
    }

    elements
}

impl Document for HtmlDocument {
    fn root(&self) -> ElementId {
        ElementId(0)
    }

    fn tag_name(&self, id: ElementId) -> String {
        self.record(id).map(|r| r.tag.clone()).unwrap_or_default()
    }

    fn attributes(&self, id: ElementId) -> Vec<(String, String)> {
        self.record(id)
            .map(|r| r.attributes.clone())
            .unwrap_or_default()
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.record(id).ok().and_then(|r| r.parent)
    }

    fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.record(id)
            .map(|r| r.children.clone())
            .unwrap_or_default()
    }

    fn query_all(&self, selector: &str) -> Result<Vec<ElementId>, SelpickError> {
        let parsed = Selector::parse(selector).map_err(|err| SelpickError::InvalidSelector {
            selector: selector.to_string(),
            reason: format!("{err:?}"),
        })?;

        let matched: HashSet<_> = self.html.select(&parsed).map(|el| el.id()).collect();
        if matched.is_empty() {
            return Ok(Vec::new());
        }

        Ok(element_refs(&self.html)
            .enumerate()
            .filter(|(_, el)| matched.contains(&el.id()))
            .map(|(index, _)| ElementId(index))
            .collect())
    }

    fn element_from_point(&self, point: Point) -> Option<ElementId> {
        // Deepest box wins; among equals the later element paints on top.
        self.rects
            .iter()
            .filter(|(_, rect)| rect.contains(point))
            .max_by_key(|(id, _)| (self.elements[id.0].depth, id.0))
            .map(|(id, _)| *id)
    }

    fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }
}
