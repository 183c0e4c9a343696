//! Layout sidecar: element boxes keyed by selector.
//!
//! A static HTML file carries no geometry, so hit testing needs boxes supplied
//! from outside, e.g. dumped from a real browser:
//!
//! ```json
//! [{ "selector": "#app button", "rect": { "x": 10, "y": 10, "width": 80, "height": 20 } }]
//! ```

use serde::Deserialize;
use selpick_core::{Rect, SelpickError};
use tracing::debug;

use crate::html::HtmlDocument;

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutEntry {
    pub selector: String,
    pub rect: Rect,
}

impl HtmlDocument {
    /// Apply layout entries; every selector must resolve to exactly one element.
    pub fn apply_layout(&mut self, entries: &[LayoutEntry]) -> Result<(), SelpickError> {
        for entry in entries {
            let id = self.find_unique(&entry.selector).map_err(|err| {
                SelpickError::Layout(format!("entry `{}`: {err}", entry.selector))
            })?;
            self.set_rect(id, entry.rect)?;
        }
        debug!(entries = entries.len(), "Applied layout");
        Ok(())
    }

    pub fn apply_layout_json(&mut self, json: &str) -> Result<(), SelpickError> {
        let entries: Vec<LayoutEntry> = serde_json::from_str(json)
            .map_err(|err| SelpickError::Layout(format!("malformed layout JSON: {err}")))?;
        self.apply_layout(&entries)
    }
}
