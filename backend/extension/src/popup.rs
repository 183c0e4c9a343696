use std::sync::Arc;

use selpick_core::{Message, TabId};
use tracing::{debug, warn};

use crate::bus::ExtensionBus;

/// What the popup does after its button is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    Closed,
    StayOpen,
}

/// The toolbar popup with its single "inspect" button.
pub struct Popup {
    bus: Arc<ExtensionBus>,
}

impl Popup {
    pub fn new(bus: Arc<ExtensionBus>) -> Self {
        Self { bus }
    }

    /// Turn on inspect mode in the active tab and close. Without an active
    /// tab there is nothing to inspect and the popup stays open.
    pub async fn on_inspect_clicked(&self, active_tab: Option<TabId>) -> PopupOutcome {
        let Some(tab) = active_tab else {
            debug!("No active tab; popup stays open");
            return PopupOutcome::StayOpen;
        };

        // Delivery is not awaited by the host either; the popup closes regardless.
        if let Err(e) = self.bus.send_to_tab(tab, Message::EnableInspectMode).await {
            warn!(%tab, error = %e, "Could not enable inspect mode");
        }
        PopupOutcome::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inspect_click_enables_and_closes() {
        let bus = Arc::new(ExtensionBus::new());
        let mut rx = bus.register_tab(TabId(2)).await;
        let popup = Popup::new(bus);

        assert_eq!(popup.on_inspect_clicked(Some(TabId(2))).await, PopupOutcome::Closed);
        assert_eq!(rx.recv().await, Some(Message::EnableInspectMode));
    }

    #[tokio::test]
    async fn test_no_active_tab_stays_open() {
        let popup = Popup::new(Arc::new(ExtensionBus::new()));
        assert_eq!(popup.on_inspect_clicked(None).await, PopupOutcome::StayOpen);
    }

    #[tokio::test]
    async fn test_unreachable_tab_still_closes() {
        let popup = Popup::new(Arc::new(ExtensionBus::new()));
        assert_eq!(popup.on_inspect_clicked(Some(TabId(8))).await, PopupOutcome::Closed);
    }
}
