//! The page-side state machine.
//!
//! One controller per page. In `Idle` it only tracks the element under the
//! last right-click; `Inspect` adds a crosshair cursor, a highlight overlay
//! following the pointer, and a click listener that commits the hovered
//! element. Every listener `Inspect` adds is removed on the way out.

use std::sync::Arc;
use std::time::Duration;

use selpick_config::defaults::DEFAULT_NOTIFICATION_TTL_MS;
use selpick_config::{CopyFormat, SelpickConfig};
use selpick_core::{Direction, ElementId, Message, Point, SelpickError};
use selpick_synth::Synthesizer;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clipboard::{copy_sync, spawn_fallback, AsyncClipboard};
use crate::surface::{Injected, ListenerId, ListenerKind, NodeHandle, Page, TimerTask};

pub const INSPECT_CURSOR_CSS: &str = "body, body * { cursor: crosshair !important; }";

const INSPECT_ENABLED_TEXT: &str = "Inspect mode enabled: click an element to copy its selector";
const GENERATION_FAILED_TEXT: &str = "Could not generate a unique selector";

/// An input event delivered to the page. Coordinates are client coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    ContextMenu(Point),
    PointerMove(Point),
    Click(Point),
    KeyDown(String),
}

/// What the handler did with the event's default action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub default_prevented: bool,
}

#[derive(Debug)]
enum Mode {
    Idle,
    Inspect(InspectSession),
}

/// Resources owned while inspecting; all released by `disable_inspect`.
#[derive(Debug)]
struct InspectSession {
    cursor_style: NodeHandle,
    listeners: Vec<ListenerId>,
}

pub struct InspectController<P: Page> {
    page: P,
    synthesizer: Synthesizer,
    copy_format: CopyFormat,
    notification_ttl: Duration,
    relay: Option<mpsc::Sender<Message>>,
    clipboard: Option<Arc<dyn AsyncClipboard>>,
    context_menu: ListenerId,
    pending_target: Option<ElementId>,
    mode: Mode,
    overlay: Option<NodeHandle>,
    highlighted: Option<ElementId>,
}

impl<P: Page> InspectController<P> {
    /// Attach to a page with the built-in heuristics. The context-menu
    /// listener is installed immediately and lives as long as the controller.
    pub fn new(mut page: P) -> Self {
        let context_menu = page.subscribe(ListenerKind::ContextMenu);
        Self {
            page,
            synthesizer: Synthesizer::default(),
            copy_format: CopyFormat::default(),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            relay: None,
            clipboard: None,
            context_menu,
            pending_target: None,
            mode: Mode::Idle,
            overlay: None,
            highlighted: None,
        }
    }

    pub fn with_config(page: P, config: &SelpickConfig) -> Result<Self, SelpickError> {
        let synthesizer = Synthesizer::from_config(&config.synth())?;
        let mut controller = Self::new(page);
        controller.synthesizer = synthesizer;
        controller.copy_format = config.copy_format();
        controller.notification_ttl = Duration::from_millis(config.notification_ttl_ms());
        Ok(controller)
    }

    /// Report results to the background context.
    pub fn with_relay(mut self, relay: mpsc::Sender<Message>) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Clipboard used when the synchronous copy fails.
    pub fn with_clipboard(mut self, clipboard: Arc<dyn AsyncClipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn pending_target(&self) -> Option<ElementId> {
        self.pending_target
    }

    pub fn is_inspecting(&self) -> bool {
        matches!(self.mode, Mode::Inspect(_))
    }

    pub fn highlighted(&self) -> Option<ElementId> {
        self.highlighted
    }

    /// Handle a message from the background context.
    pub fn handle_message(&mut self, message: Message) {
        if message.direction() != Direction::ToPage {
            debug!(action = message.action(), "Ignoring message addressed to the background");
            return;
        }

        match message {
            Message::GetSelector => match self.pending_target.take() {
                Some(target) => {
                    self.commit(target);
                }
                None => debug!("getSelector without a right-clicked element; ignoring"),
            },
            Message::EnableInspectMode => self.enable_inspect(),
            Message::SelectorGenerated { .. } | Message::SelectorGenerationFailed => {}
        }
    }

    /// Deliver a page event. Pointer, click and key events only reach the
    /// controller while it is inspecting.
    pub fn dispatch(&mut self, event: PageEvent) -> Dispatch {
        match event {
            PageEvent::ContextMenu(point) => {
                self.pending_target = self.hit_test(point);
                debug!(target = ?self.pending_target, "Captured right-click target");
                Dispatch::default()
            }
            PageEvent::PointerMove(point) if self.is_inspecting() => {
                let hovered = self.hit_test(point);
                if hovered != self.highlighted {
                    self.highlight(hovered);
                }
                Dispatch::default()
            }
            PageEvent::Click(point) if self.is_inspecting() => {
                if let Some(target) = self.highlighted.or_else(|| self.hit_test(point)) {
                    self.commit(target);
                }
                self.disable_inspect();
                Dispatch {
                    default_prevented: true,
                }
            }
            PageEvent::KeyDown(key) if self.is_inspecting() && key == "Escape" => {
                debug!("Inspect mode cancelled");
                self.disable_inspect();
                Dispatch::default()
            }
            _ => Dispatch::default(),
        }
    }

    /// Enter inspect mode. Does nothing when already inspecting.
    pub fn enable_inspect(&mut self) {
        if self.is_inspecting() {
            debug!("Inspect mode already active");
            return;
        }

        let cursor_style = self.page.inject(Injected::CursorStyle {
            css: INSPECT_CURSOR_CSS.to_string(),
        });
        if self.overlay.is_none() {
            self.overlay = Some(self.page.inject(Injected::HighlightOverlay));
        }
        let listeners = [ListenerKind::PointerMove, ListenerKind::Click, ListenerKind::KeyDown]
            .into_iter()
            .map(|kind| self.page.subscribe(kind))
            .collect();

        self.mode = Mode::Inspect(InspectSession {
            cursor_style,
            listeners,
        });
        info!("Inspect mode enabled");
        self.notify(INSPECT_ENABLED_TEXT.to_string());
    }

    /// Leave inspect mode, detaching everything it attached.
    pub fn disable_inspect(&mut self) {
        let Mode::Inspect(session) = std::mem::replace(&mut self.mode, Mode::Idle) else {
            return;
        };

        for listener in session.listeners {
            self.page.unsubscribe(listener);
        }
        self.page.remove(session.cursor_style);
        self.highlight(None);
        info!("Inspect mode disabled");
    }

    /// Tear down and hand the page back.
    pub fn detach(mut self) -> P {
        self.disable_inspect();
        self.page.unsubscribe(self.context_menu);
        if let Some(overlay) = self.overlay.take() {
            self.page.remove(overlay);
        }
        self.page
    }

    fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.page.document().element_from_point(point)
    }

    fn highlight(&mut self, target: Option<ElementId>) {
        self.highlighted = target;
        let Some(overlay) = self.overlay else {
            return;
        };
        let document = self.page.document();
        let rect = target
            .and_then(|element| document.bounding_rect(element))
            .map(|rect| rect.translate(document.scroll_offset()));
        self.page.update_overlay(overlay, rect);
    }

    /// Synthesize, copy, notify and relay. Returns the bare selector.
    fn commit(&mut self, target: ElementId) -> Option<String> {
        let Some(selector) = self.synthesizer.synthesize(self.page.document(), target) else {
            warn!(%target, "No unique selector for element");
            self.notify(GENERATION_FAILED_TEXT.to_string());
            self.relay(Message::SelectorGenerationFailed);
            return None;
        };

        let payload = self.copy_format.render(&selector);
        self.copy(&payload);
        info!(%target, %selector, "Selector generated");
        self.notify(format!("Selector copied: {payload}"));
        self.relay(Message::SelectorGenerated {
            selector: selector.clone(),
        });
        Some(selector)
    }

    fn copy(&mut self, text: &str) {
        let Err(e) = copy_sync(&mut self.page, text) else {
            return;
        };
        match &self.clipboard {
            Some(clipboard) => {
                debug!(error = %e, "Synchronous copy failed; using async clipboard");
                spawn_fallback(Arc::clone(clipboard), text.to_string());
            }
            None => warn!(error = %e, "Synchronous copy failed and no async clipboard is available"),
        }
    }

    fn notify(&mut self, text: String) {
        let toast = self.page.inject(Injected::Notification { text });
        self.page
            .set_timeout(self.notification_ttl, TimerTask::RemoveNode(toast));
    }

    fn relay(&self, message: Message) {
        let Some(relay) = &self.relay else {
            return;
        };
        if let Err(e) = relay.try_send(message) {
            warn!(error = %e, "Could not relay result to the background");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::memory::MemoryPage;
    use selpick_config::{CopyConfig, SynthConfig};
    use selpick_core::{Document, Rect};
    use selpick_dom::HtmlDocument;

    const PAGE: &str = r#"<html><body>
        <div id="app">
          <button class="flex p-2" data-testid="submit">Go</button>
          <ul><li class="item">one</li><li class="item">two</li></ul>
        </div>
      </body></html>"#;

    const BUTTON: Point = Point::new(20.0, 20.0);
    const SECOND_ITEM: Point = Point::new(20.0, 150.0);
    const BARE_HTML: Point = Point::new(1500.0, 1500.0);
    const NOWHERE: Point = Point::new(5000.0, 5000.0);

    const BUTTON_SELECTOR: &str = r#"button[data-testid="submit"]"#;

    type Controller = InspectController<MemoryPage<HtmlDocument>>;

    fn document() -> HtmlDocument {
        let mut doc = HtmlDocument::parse(PAGE);
        let layout = [
            ("html", Rect::new(0.0, 0.0, 2000.0, 2000.0)),
            ("body", Rect::new(0.0, 0.0, 800.0, 600.0)),
            ("#app", Rect::new(0.0, 0.0, 800.0, 300.0)),
            ("button", Rect::new(10.0, 10.0, 100.0, 30.0)),
            ("ul", Rect::new(10.0, 100.0, 200.0, 80.0)),
            ("li:nth-of-type(1)", Rect::new(10.0, 100.0, 200.0, 40.0)),
            ("li:nth-of-type(2)", Rect::new(10.0, 140.0, 200.0, 40.0)),
        ];
        for (css, rect) in layout {
            let id = doc.find_unique(css).unwrap();
            doc.set_rect(id, rect).unwrap();
        }
        doc
    }

    fn controller() -> Controller {
        InspectController::new(MemoryPage::new(document()))
    }

    fn inspect_listeners(page: &MemoryPage<HtmlDocument>) -> [usize; 3] {
        [
            page.listener_count(ListenerKind::PointerMove),
            page.listener_count(ListenerKind::Click),
            page.listener_count(ListenerKind::KeyDown),
        ]
    }

    #[test]
    fn test_right_click_then_menu_copies_selector() {
        let mut c = controller();
        let dispatch = c.dispatch(PageEvent::ContextMenu(BUTTON));
        assert!(!dispatch.default_prevented);
        assert!(c.pending_target().is_some());

        c.handle_message(Message::GetSelector);

        assert_eq!(c.page().clipboard(), Some(BUTTON_SELECTOR));
        assert_eq!(
            c.page().notifications(),
            vec![format!("Selector copied: {BUTTON_SELECTOR}").as_str()]
        );
        assert_eq!(c.page().count("copy_buffer"), 0);
        assert_eq!(c.pending_target(), None);
    }

    #[test]
    fn test_get_selector_without_target_is_silent() {
        let mut c = controller();
        c.handle_message(Message::GetSelector);

        c.dispatch(PageEvent::ContextMenu(NOWHERE));
        c.handle_message(Message::GetSelector);

        assert_eq!(c.page().clipboard(), None);
        assert!(c.page().notifications().is_empty());
    }

    #[test]
    fn test_failure_notifies_without_copying() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut c = controller().with_relay(tx);

        c.dispatch(PageEvent::ContextMenu(BARE_HTML));
        c.handle_message(Message::GetSelector);

        assert_eq!(c.page().clipboard(), None);
        assert_eq!(c.page().notifications(), vec![GENERATION_FAILED_TEXT]);
        assert_eq!(rx.try_recv().unwrap(), Message::SelectorGenerationFailed);
    }

    #[test]
    fn test_enable_inspect_is_idempotent() {
        let mut c = controller();
        c.enable_inspect();
        c.enable_inspect();
        c.handle_message(Message::EnableInspectMode);

        let page = c.page();
        assert!(c.is_inspecting());
        assert_eq!(page.overlays().len(), 1);
        assert_eq!(page.cursor_styles(), vec![INSPECT_CURSOR_CSS]);
        assert_eq!(inspect_listeners(page), [1, 1, 1]);
        assert_eq!(page.notifications(), vec![INSPECT_ENABLED_TEXT]);
    }

    #[test]
    fn test_toggling_does_not_leak_listeners() {
        let mut c = controller();
        for _ in 0..5 {
            c.enable_inspect();
            c.dispatch(PageEvent::PointerMove(BUTTON));
            c.disable_inspect();
            c.disable_inspect();
        }

        let page = c.page();
        assert!(!c.is_inspecting());
        assert_eq!(inspect_listeners(page), [0, 0, 0]);
        assert_eq!(page.listener_count(ListenerKind::ContextMenu), 1);
        assert!(page.cursor_styles().is_empty());
        assert_eq!(page.overlays(), vec![None]);
        assert_eq!(c.highlighted(), None);
    }

    #[test]
    fn test_pointer_move_tracks_overlay() {
        let mut c = controller();
        c.page_mut()
            .document_mut()
            .set_scroll_offset(Point::new(0.0, 50.0));
        c.enable_inspect();

        c.dispatch(PageEvent::PointerMove(BUTTON));
        let button = c.page().document().element_from_point(BUTTON);
        assert_eq!(c.highlighted(), button);
        assert_eq!(
            c.page().overlays(),
            vec![Some(Rect::new(10.0, 60.0, 100.0, 30.0))]
        );

        c.dispatch(PageEvent::PointerMove(NOWHERE));
        assert_eq!(c.highlighted(), None);
        assert_eq!(c.page().overlays(), vec![None]);
    }

    #[test]
    fn test_click_commits_highlighted_element_and_exits() {
        let mut c = controller();
        c.enable_inspect();
        c.dispatch(PageEvent::PointerMove(SECOND_ITEM));

        let dispatch = c.dispatch(PageEvent::Click(SECOND_ITEM));

        assert!(dispatch.default_prevented);
        assert_eq!(c.page().clipboard(), Some("li.item:nth-of-type(2)"));
        assert!(!c.is_inspecting());
        assert_eq!(inspect_listeners(c.page()), [0, 0, 0]);
        assert_eq!(c.page().overlays(), vec![None]);
    }

    #[test]
    fn test_click_without_hover_hit_tests() {
        let mut c = controller();
        c.enable_inspect();
        c.dispatch(PageEvent::Click(BUTTON));
        assert_eq!(c.page().clipboard(), Some(BUTTON_SELECTOR));
    }

    #[test]
    fn test_idle_ignores_pointer_and_click() {
        let mut c = controller();
        c.dispatch(PageEvent::PointerMove(BUTTON));
        let dispatch = c.dispatch(PageEvent::Click(BUTTON));

        assert!(!dispatch.default_prevented);
        assert_eq!(c.highlighted(), None);
        assert!(c.page().overlays().is_empty());
        assert_eq!(c.page().clipboard(), None);
    }

    #[test]
    fn test_escape_leaves_inspect_without_selecting() {
        let mut c = controller();
        c.enable_inspect();
        c.dispatch(PageEvent::KeyDown("a".into()));
        assert!(c.is_inspecting());

        c.dispatch(PageEvent::KeyDown("Escape".into()));
        assert!(!c.is_inspecting());
        assert_eq!(c.page().clipboard(), None);
    }

    #[test]
    fn test_notifications_expire() {
        let mut c = controller();
        c.dispatch(PageEvent::ContextMenu(BUTTON));
        c.handle_message(Message::GetSelector);

        c.page_mut().advance(Duration::from_millis(2999));
        assert_eq!(c.page().notifications().len(), 1);
        c.page_mut().advance(Duration::from_millis(1));
        assert!(c.page().notifications().is_empty());
    }

    #[test]
    fn test_configured_ttl_and_copy_format() {
        let config = SelpickConfig {
            notification: Some(selpick_config::NotificationConfig { ttl_ms: Some(500) }),
            copy: Some(CopyConfig {
                format: Some(CopyFormat::QuerySelector),
            }),
            ..Default::default()
        };
        let (tx, mut rx) = mpsc::channel(4);
        let mut c = InspectController::with_config(MemoryPage::new(document()), &config)
            .unwrap()
            .with_relay(tx);

        c.dispatch(PageEvent::ContextMenu(BUTTON));
        c.handle_message(Message::GetSelector);

        let expected = format!("document.querySelector(`{BUTTON_SELECTOR}`)");
        assert_eq!(c.page().clipboard(), Some(expected.as_str()));
        assert_eq!(
            rx.try_recv().unwrap(),
            Message::SelectorGenerated {
                selector: BUTTON_SELECTOR.into()
            }
        );

        c.page_mut().advance(Duration::from_millis(500));
        assert!(c.page().notifications().is_empty());
    }

    #[test]
    fn test_indistinguishable_siblings_fail_without_positional_fallback() {
        let config = SelpickConfig {
            synth: Some(SynthConfig {
                positional_fallback: false,
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut c = InspectController::with_config(MemoryPage::new(document()), &config).unwrap();
        c.enable_inspect();
        c.dispatch(PageEvent::Click(SECOND_ITEM));

        assert_eq!(c.page().clipboard(), None);
        assert!(c
            .page()
            .notifications()
            .contains(&GENERATION_FAILED_TEXT));
    }

    #[tokio::test]
    async fn test_sync_copy_failure_falls_back_to_async_clipboard() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let mut c = controller().with_clipboard(clipboard.clone());
        c.page_mut().set_copy_fails(true);

        c.dispatch(PageEvent::ContextMenu(BUTTON));
        c.handle_message(Message::GetSelector);

        assert_eq!(c.page().clipboard(), None);
        assert_eq!(c.page().count("copy_buffer"), 0);
        assert_eq!(c.page().notifications().len(), 1);

        let copied = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if let Some(text) = clipboard.contents().await {
                    break text;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert_eq!(copied, BUTTON_SELECTOR);
    }

    #[test]
    fn test_full_relay_does_not_block() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut c = controller().with_relay(tx);

        for _ in 0..2 {
            c.dispatch(PageEvent::ContextMenu(BUTTON));
            c.handle_message(Message::GetSelector);
        }

        assert!(matches!(rx.try_recv(), Ok(Message::SelectorGenerated { .. })));
        assert!(rx.try_recv().is_err());
        assert_eq!(c.page().notifications().len(), 2);
    }

    #[test]
    fn test_background_bound_messages_are_ignored() {
        let mut c = controller();
        c.dispatch(PageEvent::ContextMenu(BUTTON));
        c.handle_message(Message::SelectorGenerationFailed);
        assert!(c.pending_target().is_some());
        assert!(c.page().notifications().is_empty());
    }

    #[test]
    fn test_detach_releases_everything() {
        let mut c = controller();
        c.enable_inspect();
        let page = c.detach();

        assert_eq!(page.listener_count(ListenerKind::ContextMenu), 0);
        assert_eq!(inspect_listeners(&page), [0, 0, 0]);
        assert!(page.overlays().is_empty());
        assert!(page.cursor_styles().is_empty());
    }
}
