//! Background (privileged) context.
//!
//! Registers the context-menu entry, forwards menu clicks to the tab they
//! happened in, and records what pages report back.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use logging::{EventLogEntry, EventLogger, SelectorEvent};
use selpick_core::{Component, Direction, Message, TabId};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use crate::bus::ExtensionBus;
use crate::menu::{ContextMenuEntry, GET_SELECTOR_MENU_ID};

const DEFAULT_HISTORY_LIMIT: usize = 100;

pub struct Background {
    bus: Arc<ExtensionBus>,
    menus: RwLock<Vec<ContextMenuEntry>>,
    history: RwLock<VecDeque<EventLogEntry>>,
    history_limit: usize,
}

impl Background {
    pub fn new(bus: Arc<ExtensionBus>) -> Self {
        Self {
            bus,
            menus: RwLock::new(Vec::new()),
            history: RwLock::new(VecDeque::new()),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Keep at most `limit` recorded events.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Install hook: register the context-menu entry. Running it again
    /// replaces the entry rather than adding a second one.
    pub async fn on_installed(&self) -> ContextMenuEntry {
        let entry = ContextMenuEntry::get_selector();
        let mut menus = self.menus.write().await;
        menus.retain(|existing| existing.id != entry.id);
        menus.push(entry.clone());
        info!(id = %entry.id, "Context menu registered");
        entry
    }

    pub async fn menus(&self) -> Vec<ContextMenuEntry> {
        self.menus.read().await.clone()
    }

    /// Context-menu click. Asks the tab for a selector; clicks on other
    /// entries or outside a tab are ignored. Returns whether a request went out.
    pub async fn on_menu_clicked(&self, menu_id: &str, tab: Option<TabId>) -> bool {
        if menu_id != GET_SELECTOR_MENU_ID {
            debug!(menu_id, "Ignoring click on unknown menu entry");
            return false;
        }
        let Some(tab) = tab else {
            debug!("Menu clicked outside a tab; ignoring");
            return false;
        };

        match self.bus.send_to_tab(tab, Message::GetSelector).await {
            Ok(()) => true,
            Err(e) => {
                warn!(%tab, error = %e, "Could not reach content script");
                false
            }
        }
    }

    /// Recorded events, oldest first.
    pub async fn history(&self) -> Vec<EventLogEntry> {
        self.history.read().await.iter().cloned().collect()
    }

    /// Log a page report and keep it in the history.
    pub async fn record(&self, tab: Option<TabId>, message: &Message) {
        let Some(event) = SelectorEvent::from_message(message) else {
            debug!(action = message.action(), "Ignoring page-bound message");
            return;
        };

        let entry = EventLogger::log_event(tab, event);
        let mut history = self.history.write().await;
        history.push_back(entry);
        while history.len() > self.history_limit {
            history.pop_front();
        }
    }
}

#[async_trait]
impl Component for Background {
    fn name(&self) -> &str {
        "background"
    }

    async fn start(&self, mut rx: mpsc::Receiver<Message>) -> Result<()> {
        info!("Background relay started");

        while let Some(message) = rx.recv().await {
            if message.direction() == Direction::ToBackground {
                self.record(None, &message).await;
            } else {
                debug!(action = message.action(), "Background received a page-bound message");
            }
        }

        info!("Background relay stopped");
        Ok(())
    }
}
