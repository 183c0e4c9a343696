use std::collections::HashMap;

use selpick_core::{Message, SelpickError, TabId};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Default channel buffer size for extension messaging.
const DEFAULT_BUFFER_SIZE: usize = 64;

/// The message bus between the background context and the content scripts.
///
/// Pages report to the background over one shared channel; the background
/// reaches each tab over that tab's own channel. Sends never wait: the host's
/// message passing is fire-and-forget, so a full or closed channel is an error
/// for the caller to log, not something to block on.
pub struct ExtensionBus {
    background_tx: mpsc::Sender<Message>,
    background_rx: Option<mpsc::Receiver<Message>>,
    tabs: RwLock<HashMap<TabId, mpsc::Sender<Message>>>,
    buffer: usize,
}

impl ExtensionBus {
    /// Create a new bus with default buffer sizes.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Create a new bus with a custom buffer size, used for every channel.
    pub fn with_buffer_size(buffer: usize) -> Self {
        let (background_tx, background_rx) = mpsc::channel(buffer);

        info!(buffer_size = buffer, "ExtensionBus initialized");

        Self {
            background_tx,
            background_rx: Some(background_rx),
            tabs: RwLock::new(HashMap::new()),
            buffer,
        }
    }

    /// Sender for page-to-background reports.
    pub fn background_tx(&self) -> mpsc::Sender<Message> {
        self.background_tx.clone()
    }

    /// Take the background receiver (can only be called once).
    pub fn take_background_rx(&mut self) -> Option<mpsc::Receiver<Message>> {
        debug!("Background receiver taken");
        self.background_rx.take()
    }

    /// Open a channel to a tab. Re-registering a tab replaces its old channel.
    pub async fn register_tab(&self, tab: TabId) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(self.buffer);
        if self.tabs.write().await.insert(tab, tx).is_some() {
            debug!(%tab, "Replaced existing tab channel");
        }
        info!(%tab, "Tab registered");
        rx
    }

    pub async fn unregister_tab(&self, tab: TabId) {
        if self.tabs.write().await.remove(&tab).is_some() {
            info!(%tab, "Tab unregistered");
        }
    }

    pub async fn tab_count(&self) -> usize {
        self.tabs.read().await.len()
    }

    /// Deliver a message to a tab without waiting.
    pub async fn send_to_tab(&self, tab: TabId, message: Message) -> Result<(), SelpickError> {
        let tabs = self.tabs.read().await;
        let tx = tabs
            .get(&tab)
            .ok_or_else(|| SelpickError::ChannelClosed(format!("{tab} has no content script")))?;

        debug!(%tab, action = message.action(), "Sending to tab");
        tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => SelpickError::ChannelClosed(format!("{tab} channel is full")),
            TrySendError::Closed(_) => SelpickError::ChannelClosed(format!("{tab} channel is closed")),
        })
    }
}

impl Default for ExtensionBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tab_send_receive() {
        let bus = ExtensionBus::new();
        let mut rx = bus.register_tab(TabId(1)).await;

        bus.send_to_tab(TabId(1), Message::GetSelector).await.unwrap();
        assert_eq!(rx.recv().await, Some(Message::GetSelector));
    }

    #[tokio::test]
    async fn test_take_background_rx_once() {
        let mut bus = ExtensionBus::new();
        assert!(bus.take_background_rx().is_some());
        assert!(bus.take_background_rx().is_none()); // second take is None
    }

    #[tokio::test]
    async fn test_unknown_tab_is_an_error() {
        let bus = ExtensionBus::new();
        let result = bus.send_to_tab(TabId(9), Message::EnableInspectMode).await;
        assert!(matches!(result, Err(SelpickError::ChannelClosed(_))));
    }

    #[tokio::test]
    async fn test_backpressure_does_not_block() {
        let bus = ExtensionBus::with_buffer_size(2);
        let _rx = bus.register_tab(TabId(1)).await;

        // Fill the buffer
        for _ in 0..2 {
            bus.send_to_tab(TabId(1), Message::GetSelector).await.unwrap();
        }

        // Third send fails immediately instead of waiting
        let result = bus.send_to_tab(TabId(1), Message::GetSelector).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_closed_tab_and_unregister() {
        let bus = ExtensionBus::new();
        drop(bus.register_tab(TabId(3)).await);
        assert!(bus.send_to_tab(TabId(3), Message::GetSelector).await.is_err());

        bus.unregister_tab(TabId(3)).await;
        assert_eq!(bus.tab_count().await, 0);
    }
}
