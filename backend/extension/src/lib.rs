//! The extension side of selpick: what the browser host calls into.
//!
//! The background context owns the context-menu entry and logs results; the
//! popup turns on inspect mode; each tab runs a content script around an
//! [`selpick_page::InspectController`]. They talk over an [`ExtensionBus`].

pub mod background;
pub mod bus;
pub mod content;
pub mod menu;
pub mod popup;

pub use background::Background;
pub use bus::ExtensionBus;
pub use content::ContentScript;
pub use menu::{ContextMenuEntry, MenuContext, GET_SELECTOR_MENU_ID};
pub use popup::{Popup, PopupOutcome};
