use thiserror::Error;

use crate::types::ElementId;

/// Top-level error type for selpick.
#[derive(Debug, Error)]
pub enum SelpickError {
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("unknown element handle: {0}")]
    UnknownElement(ElementId),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error("channel closed: {0}")]
    ChannelClosed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
