use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::SelpickError;
use crate::message::Message;
use crate::types::{ElementId, Point, Rect};

/// Trait for long-running selpick components (the background relay, content scripts).
///
/// Each component consumes messages from its channel until the sender side closes.
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Human-readable name of this component.
    fn name(&self) -> &str;

    /// Start the component's event loop, consuming from the given receiver.
    async fn start(&self, rx: mpsc::Receiver<Message>) -> Result<()>;
}

/// A live document as seen by the selector synthesizer and the page controller.
///
/// Element handles are plain indices; the document owns the tree. `query_all`
/// is the uniqueness oracle: every synthesized candidate is validated by
/// running it back through the document's own selector engine.
pub trait Document {
    /// The root element (`<html>`). Selector paths never include it.
    fn root(&self) -> ElementId;

    /// Lower-cased tag name.
    fn tag_name(&self, id: ElementId) -> String;

    /// All attributes in source order.
    fn attributes(&self, id: ElementId) -> Vec<(String, String)>;

    fn parent(&self, id: ElementId) -> Option<ElementId>;

    /// Element children in document order.
    fn children(&self, id: ElementId) -> Vec<ElementId>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Result<Vec<ElementId>, SelpickError>;

    /// Topmost element under a viewport point.
    fn element_from_point(&self, point: Point) -> Option<ElementId>;

    /// Viewport-relative bounding box, if the element is laid out.
    fn bounding_rect(&self, id: ElementId) -> Option<Rect>;

    /// Current window scroll position.
    fn scroll_offset(&self) -> Point {
        Point::default()
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.attributes(id)
            .into_iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value)
    }

    /// Whitespace-separated tokens of the `class` attribute.
    fn classes(&self, id: ElementId) -> Vec<String> {
        self.attribute(id, "class")
            .map(|value| value.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Number of matches; an unparsable selector is reported as an error.
    fn match_count(&self, selector: &str) -> Result<usize, SelpickError> {
        self.query_all(selector).map(|matches| matches.len())
    }

    /// True iff exactly one element matches. Invalid selectors never match.
    fn is_unique(&self, selector: &str) -> bool {
        matches!(self.match_count(selector), Ok(1))
    }

    /// True iff `selector` matches exactly `id` and nothing else.
    fn resolves_to(&self, selector: &str, id: ElementId) -> bool {
        matches!(self.query_all(selector).as_deref(), Ok([only]) if *only == id)
    }

    /// 1-based position among element siblings with the same tag, and the size of that group.
    fn nth_of_type(&self, id: ElementId) -> (usize, usize) {
        let Some(parent) = self.parent(id) else {
            return (1, 1);
        };
        let tag = self.tag_name(id);
        let same_type: Vec<ElementId> = self
            .children(parent)
            .into_iter()
            .filter(|sibling| self.tag_name(*sibling) == tag)
            .collect();
        let index = same_type
            .iter()
            .position(|sibling| *sibling == id)
            .map_or(1, |pos| pos + 1);
        (index, same_type.len().max(1))
    }
}
