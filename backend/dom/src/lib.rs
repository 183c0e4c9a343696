//! Document backends for selpick.
//!
//! `HtmlDocument` parses markup with `scraper` and answers selector queries
//! with the same engine, so every synthesized selector is validated against a
//! real CSS matcher rather than a hand-rolled one.

pub mod html;
pub mod layout;

pub use html::HtmlDocument;
pub use layout::LayoutEntry;
