//! In-memory page host.

use std::collections::BTreeMap;
use std::time::Duration;

use selpick_core::{Document, Rect, SelpickError};
use tracing::{debug, trace};

use crate::surface::{Injected, ListenerId, ListenerKind, NodeHandle, Page, PageChrome, TimerTask};

#[derive(Debug, Clone)]
struct InjectedNode {
    content: Injected,
    /// Overlay position; `None` means hidden.
    rect: Option<Rect>,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    due: Duration,
    task: TimerTask,
}

/// A page that keeps its injected nodes, listeners, timers and clipboard in
/// memory. Time only moves through [`MemoryPage::advance`].
#[derive(Debug)]
pub struct MemoryPage<D> {
    document: D,
    nodes: BTreeMap<NodeHandle, InjectedNode>,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    timers: Vec<PendingTimer>,
    next_id: u64,
    now: Duration,
    clipboard: Option<String>,
    copy_fails: bool,
}

impl<D: Document> MemoryPage<D> {
    pub fn new(document: D) -> Self {
        Self {
            document,
            nodes: BTreeMap::new(),
            listeners: BTreeMap::new(),
            timers: Vec::new(),
            next_id: 1,
            now: Duration::ZERO,
            clipboard: None,
            copy_fails: false,
        }
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Make the synchronous copy fail, as when the page denies `execCommand`.
    pub fn set_copy_fails(&mut self, fails: bool) {
        self.copy_fails = fails;
    }

    /// Text written by the last successful synchronous copy.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Number of injected nodes of a kind (see [`Injected::kind`]).
    pub fn count(&self, kind: &str) -> usize {
        self.nodes
            .values()
            .filter(|node| node.content.kind() == kind)
            .count()
    }

    /// Visible notification texts, oldest first.
    pub fn notifications(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter_map(|node| match &node.content {
                Injected::Notification { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn cursor_styles(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter_map(|node| match &node.content {
                Injected::CursorStyle { css } => Some(css.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Position of every overlay node; `None` entries are hidden.
    pub fn overlays(&self) -> Vec<Option<Rect>> {
        self.nodes
            .values()
            .filter(|node| node.content == Injected::HighlightOverlay)
            .map(|node| node.rect)
            .collect()
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.listeners.values().filter(|k| **k == kind).count()
    }

    pub fn is_subscribed(&self, kind: ListenerKind) -> bool {
        self.listener_count(kind) > 0
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and run every timer that came due, in due order.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|timer| timer.due <= now);
        self.timers = pending;
        due.sort_by_key(|timer| timer.due);

        for timer in due {
            trace!(task = ?timer.task, "Timer fired");
            match timer.task {
                TimerTask::RemoveNode(node) => self.remove(node),
            }
        }
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl<D: Document> PageChrome for MemoryPage<D> {
    fn inject(&mut self, content: Injected) -> NodeHandle {
        let handle = NodeHandle(self.next());
        debug!(%handle, kind = content.kind(), "Injected node");
        self.nodes.insert(handle, InjectedNode { content, rect: None });
        handle
    }

    fn update_overlay(&mut self, overlay: NodeHandle, rect: Option<Rect>) {
        if let Some(node) = self.nodes.get_mut(&overlay) {
            node.rect = rect;
        }
    }

    fn remove(&mut self, node: NodeHandle) {
        if let Some(removed) = self.nodes.remove(&node) {
            debug!(handle = %node, kind = removed.content.kind(), "Removed node");
        }
    }

    fn exec_copy(&mut self, buffer: NodeHandle) -> Result<(), SelpickError> {
        if self.copy_fails {
            return Err(SelpickError::Clipboard("copy command rejected".into()));
        }
        match self.nodes.get(&buffer).map(|node| &node.content) {
            Some(Injected::CopyBuffer { text }) => {
                self.clipboard = Some(text.clone());
                Ok(())
            }
            _ => Err(SelpickError::Clipboard(format!("{buffer} is not a copy buffer"))),
        }
    }

    fn subscribe(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }

    fn set_timeout(&mut self, delay: Duration, task: TimerTask) {
        self.timers.push(PendingTimer {
            due: self.now + delay,
            task,
        });
    }
}

impl<D: Document> Page for MemoryPage<D> {
    fn document(&self) -> &dyn Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selpick_dom::HtmlDocument;

    fn page() -> MemoryPage<HtmlDocument> {
        MemoryPage::new(HtmlDocument::parse("<p>x</p>"))
    }

    #[test]
    fn timers_fire_once_due() {
        let mut page = page();
        let toast = page.inject(Injected::Notification { text: "hi".into() });
        page.set_timeout(Duration::from_millis(3000), TimerTask::RemoveNode(toast));

        page.advance(Duration::from_millis(2999));
        assert_eq!(page.notifications(), vec!["hi"]);

        page.advance(Duration::from_millis(1));
        assert!(page.notifications().is_empty());
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn overlay_position_is_tracked() {
        let mut page = page();
        let overlay = page.inject(Injected::HighlightOverlay);
        assert_eq!(page.overlays(), vec![None]);

        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        page.update_overlay(overlay, Some(rect));
        assert_eq!(page.overlays(), vec![Some(rect)]);
    }

    #[test]
    fn listeners_subscribe_and_unsubscribe() {
        let mut page = page();
        let click = page.subscribe(ListenerKind::Click);
        assert!(page.is_subscribed(ListenerKind::Click));
        page.unsubscribe(click);
        assert!(!page.is_subscribed(ListenerKind::Click));
        page.unsubscribe(click);
    }

    #[test]
    fn exec_copy_requires_a_copy_buffer() {
        let mut page = page();
        let style = page.inject(Injected::CursorStyle { css: String::new() });
        assert!(page.exec_copy(style).is_err());
        assert_eq!(page.clipboard(), None);
    }
}
