//! `selpick pick`: right-click a point and choose "Copy element selector".
//!
//! Runs the same path a browser does: the content script captures the
//! right-clicked element, the background forwards the menu click, the page
//! synthesizes and copies, and the result is reported back.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use selpick_config::SelpickConfig;
use selpick_core::{Message, Point, TabId};
use selpick_extension::{Background, ContentScript, ExtensionBus, GET_SELECTOR_MENU_ID};
use selpick_page::{MemoryPage, PageEvent};
use tracing::info;

use crate::input::load_document_with_layout;
use crate::terminal_output::{note_error, note_info, note_warn};

const TAB: TabId = TabId(1);

/// Prints the copied text. Returns `false` when nothing was copied.
pub async fn run(config: &SelpickConfig, html: &Path, layout: &Path, point: Point) -> Result<bool> {
    let document = load_document_with_layout(html, layout).await?;

    let mut bus = ExtensionBus::new();
    let mut reports = bus
        .take_background_rx()
        .context("background receiver already taken")?;
    let bus = Arc::new(bus);
    let background = Background::new(bus.clone());
    background.on_installed().await;

    let mut content = ContentScript::attach(TAB, MemoryPage::new(document), config, &bus).await?;

    content.dispatch(PageEvent::ContextMenu(point));
    let Some(target) = content.controller().pending_target() else {
        note_warn(&format!("No element at ({}, {})", point.x, point.y));
        return Ok(false);
    };
    info!(%target, "Right-clicked element");

    background.on_menu_clicked(GET_SELECTOR_MENU_ID, Some(TAB)).await;
    content.handle_next().await;

    let Ok(report) = reports.try_recv() else {
        note_error("The page did not report a result");
        return Ok(false);
    };
    background.record(Some(TAB), &report).await;

    let page = content.controller().page();
    for notification in page.notifications() {
        note_info(notification);
    }

    match (report, page.clipboard()) {
        (Message::SelectorGenerated { .. }, Some(copied)) => {
            println!("{copied}");
            Ok(true)
        }
        _ => Ok(false),
    }
}
