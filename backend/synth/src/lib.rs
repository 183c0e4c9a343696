//! Selector synthesis.
//!
//! Given a document and a target element, produce a short CSS selector that
//! resolves to exactly that element, preferring ids, semantic attributes and
//! non-utility class names over positional qualifiers.

pub mod escape;
pub mod fragment;
pub mod heuristics;
pub mod path;
pub mod synthesizer;

pub use fragment::{Fragment, Qualifier};
pub use heuristics::Heuristics;
pub use path::assemble;
pub use synthesizer::{synthesize, Synthesizer};
