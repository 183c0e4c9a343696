use serde::{Deserialize, Serialize};

pub const GET_SELECTOR_MENU_ID: &str = "getSelector";

/// Where a context-menu entry is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuContext {
    All,
    Page,
    Selection,
    Link,
    Image,
}

/// A context-menu registration, in the shape the host's menu API takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuEntry {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

impl ContextMenuEntry {
    /// The single "copy element selector" entry, shown everywhere on a page.
    pub fn get_selector() -> Self {
        Self {
            id: GET_SELECTOR_MENU_ID.to_string(),
            title: "Copy element selector".to_string(),
            contexts: vec![MenuContext::All],
        }
    }
}
