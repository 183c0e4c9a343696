//! The page surface the controller drives.
//!
//! Everything the controller does to a page goes through [`PageChrome`]:
//! injecting and removing its own nodes, positioning the highlight overlay,
//! the synchronous copy, event subscriptions and timers. A browser binding
//! implements it over the real DOM; [`crate::MemoryPage`] implements it in memory.

use std::fmt;
use std::time::Duration;

use selpick_core::{Document, Rect, SelpickError};

/// Handle to a node the controller injected into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(pub u64);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Handle to an active event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Page events the controller can listen for. All are capture-phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    ContextMenu,
    PointerMove,
    Click,
    KeyDown,
}

/// Nodes the controller injects into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injected {
    /// Non-interactive, absolutely positioned box tracking the hovered element.
    HighlightOverlay,
    /// A document-wide `<style>` element.
    CursorStyle { css: String },
    /// Transient toast shown to the user.
    Notification { text: String },
    /// Off-screen editable element holding text for the synchronous copy.
    CopyBuffer { text: String },
}

impl Injected {
    pub fn kind(&self) -> &'static str {
        match self {
            Injected::HighlightOverlay => "highlight_overlay",
            Injected::CursorStyle { .. } => "cursor_style",
            Injected::Notification { .. } => "notification",
            Injected::CopyBuffer { .. } => "copy_buffer",
        }
    }
}

/// Deferred work handed to the page's timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    RemoveNode(NodeHandle),
}

/// Mutations and subscriptions the controller performs on a page.
pub trait PageChrome {
    fn inject(&mut self, node: Injected) -> NodeHandle;

    /// Move the overlay over `rect` (document coordinates), or hide it with `None`.
    fn update_overlay(&mut self, overlay: NodeHandle, rect: Option<Rect>);

    /// Remove an injected node. Unknown handles are ignored.
    fn remove(&mut self, node: NodeHandle);

    /// Copy the contents of an injected [`Injected::CopyBuffer`] synchronously.
    fn exec_copy(&mut self, buffer: NodeHandle) -> Result<(), SelpickError>;

    fn subscribe(&mut self, kind: ListenerKind) -> ListenerId;

    fn unsubscribe(&mut self, listener: ListenerId);

    fn set_timeout(&mut self, delay: Duration, task: TimerTask);
}

/// A page: chrome plus the document it renders.
pub trait Page: PageChrome {
    fn document(&self) -> &dyn Document;
}
