//! Per-tab content script.
//!
//! Wraps the page's [`InspectController`] and feeds it the messages the
//! background and popup send to this tab. Pages are usually not `Send`, so a
//! content script runs on the task that owns the page rather than being spawned.

use std::sync::Arc;

use selpick_config::SelpickConfig;
use selpick_core::{Message, SelpickError, TabId};
use selpick_page::{AsyncClipboard, Dispatch, InspectController, Page, PageEvent};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::bus::ExtensionBus;

pub struct ContentScript<P: Page> {
    tab: TabId,
    controller: InspectController<P>,
    rx: mpsc::Receiver<Message>,
}

impl<P: Page> ContentScript<P> {
    /// Register `tab` on the bus and attach a controller to its page.
    pub async fn attach(
        tab: TabId,
        page: P,
        config: &SelpickConfig,
        bus: &ExtensionBus,
    ) -> Result<Self, SelpickError> {
        let controller = InspectController::with_config(page, config)?.with_relay(bus.background_tx());
        let rx = bus.register_tab(tab).await;
        info!(%tab, "Content script attached");
        Ok(Self { tab, controller, rx })
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn AsyncClipboard>) -> Self {
        self.controller = self.controller.with_clipboard(clipboard);
        self
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    pub fn controller(&self) -> &InspectController<P> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InspectController<P> {
        &mut self.controller
    }

    /// Forward a page event to the controller.
    pub fn dispatch(&mut self, event: PageEvent) -> Dispatch {
        self.controller.dispatch(event)
    }

    /// Wait for the next message and handle it. `false` once the channel is closed.
    pub async fn handle_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.handle(message);
                true
            }
            None => false,
        }
    }

    /// Handle every message already queued, without waiting. Returns how many there were.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Handle messages until the tab's channel closes, then detach and return the page.
    pub async fn run(mut self) -> P {
        while self.handle_next().await {}
        info!(tab = %self.tab, "Content script channel closed");
        self.controller.detach()
    }

    fn handle(&mut self, message: Message) {
        debug!(tab = %self.tab, action = message.action(), "Content script received message");
        self.controller.handle_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::Background;
    use crate::menu::GET_SELECTOR_MENU_ID;
    use crate::popup::{Popup, PopupOutcome};
    use logging::SelectorEvent;
    use selpick_core::{Point, Rect};
    use selpick_dom::HtmlDocument;
    use selpick_page::{ListenerKind, MemoryPage};

    const PAGE: &str = r#"<html><body>
        <nav><a href="/docs" class="nav-link">Docs</a></nav>
        <main><h1 class="title">Hello</h1></main>
      </body></html>"#;

    const LINK: Point = Point::new(15.0, 15.0);

    fn page() -> MemoryPage<HtmlDocument> {
        let mut doc = HtmlDocument::parse(PAGE);
        doc.apply_layout_json(
            r#"[
                {"selector": "body", "rect": {"x": 0, "y": 0, "width": 800, "height": 600}},
                {"selector": "nav", "rect": {"x": 0, "y": 0, "width": 800, "height": 40}},
                {"selector": "a", "rect": {"x": 10, "y": 10, "width": 60, "height": 20}},
                {"selector": "h1", "rect": {"x": 10, "y": 60, "width": 300, "height": 40}}
            ]"#,
        )
        .unwrap();
        MemoryPage::new(doc)
    }

    #[tokio::test]
    async fn test_context_menu_round_trip() {
        let mut bus = ExtensionBus::new();
        let mut background_rx = bus.take_background_rx().unwrap();
        let bus = Arc::new(bus);
        let background = Background::new(bus.clone());
        background.on_installed().await;

        let mut content = ContentScript::attach(TabId(1), page(), &SelpickConfig::default(), &bus)
            .await
            .unwrap();

        content.dispatch(PageEvent::ContextMenu(LINK));
        assert!(background.on_menu_clicked(GET_SELECTOR_MENU_ID, Some(TabId(1))).await);
        assert!(content.handle_next().await);

        let expected = r#"a[href="/docs"]"#;
        assert_eq!(content.controller().page().clipboard(), Some(expected));

        let report = background_rx.recv().await.unwrap();
        background.record(Some(content.tab()), &report).await;
        let history = background.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(
            history[0].event,
            SelectorEvent::Generated {
                selector: expected.into()
            }
        );
    }

    #[tokio::test]
    async fn test_popup_enables_inspect_mode() {
        let bus = Arc::new(ExtensionBus::new());
        let popup = Popup::new(bus.clone());
        let mut content = ContentScript::attach(TabId(2), page(), &SelpickConfig::default(), &bus)
            .await
            .unwrap();

        assert_eq!(popup.on_inspect_clicked(Some(TabId(2))).await, PopupOutcome::Closed);
        assert_eq!(content.drain(), 1);
        assert!(content.controller().is_inspecting());

        content.dispatch(PageEvent::PointerMove(Point::new(20.0, 70.0)));
        assert_eq!(
            content.controller().page().overlays(),
            vec![Some(Rect::new(10.0, 60.0, 300.0, 40.0))]
        );

        let dispatch = content.dispatch(PageEvent::Click(Point::new(20.0, 70.0)));
        assert!(dispatch.default_prevented);
        assert_eq!(content.controller().page().clipboard(), Some("h1.title"));
        assert!(!content.controller().is_inspecting());
    }

    #[tokio::test]
    async fn test_run_stops_when_tab_closes() {
        let bus = ExtensionBus::new();
        let mut content = ContentScript::attach(TabId(3), page(), &SelpickConfig::default(), &bus)
            .await
            .unwrap();
        content.dispatch(PageEvent::ContextMenu(LINK));

        bus.send_to_tab(TabId(3), Message::GetSelector).await.unwrap();
        bus.unregister_tab(TabId(3)).await;

        let page = content.run().await;
        assert_eq!(page.clipboard(), Some(r#"a[href="/docs"]"#));
        assert_eq!(page.listener_count(ListenerKind::ContextMenu), 0);
    }
}
