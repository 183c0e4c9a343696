//! Clipboard writes.
//!
//! The synchronous path copies through a temporary [`Injected::CopyBuffer`]
//! that is removed when the guard drops, whether or not the copy succeeded.
//! When it fails, the text goes to an [`AsyncClipboard`] on a spawned task
//! that nobody awaits.

use std::sync::Arc;

use async_trait::async_trait;
use selpick_core::SelpickError;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::surface::{Injected, NodeHandle, PageChrome};

/// The asynchronous clipboard API used as fallback.
#[async_trait]
pub trait AsyncClipboard: Send + Sync + 'static {
    async fn write_text(&self, text: &str) -> Result<(), SelpickError>;
}

/// Scoped copy buffer. Removed from the page on drop.
struct CopyBuffer<'a, P: PageChrome + ?Sized> {
    page: &'a mut P,
    node: NodeHandle,
}

impl<'a, P: PageChrome + ?Sized> CopyBuffer<'a, P> {
    fn acquire(page: &'a mut P, text: &str) -> Self {
        let node = page.inject(Injected::CopyBuffer {
            text: text.to_string(),
        });
        Self { page, node }
    }

    fn copy(&mut self) -> Result<(), SelpickError> {
        self.page.exec_copy(self.node)
    }
}

impl<P: PageChrome + ?Sized> Drop for CopyBuffer<'_, P> {
    fn drop(&mut self) {
        self.page.remove(self.node);
    }
}

/// Synchronous copy through a temporary buffer node.
pub(crate) fn copy_sync<P: PageChrome + ?Sized>(page: &mut P, text: &str) -> Result<(), SelpickError> {
    CopyBuffer::acquire(page, text).copy()
}

/// Fire-and-forget write on the current runtime. A rejection is only logged.
pub(crate) fn spawn_fallback(clipboard: Arc<dyn AsyncClipboard>, text: String) {
    let Ok(handle) = Handle::try_current() else {
        warn!("No async runtime for the clipboard fallback; selector not copied");
        return;
    };

    handle.spawn(async move {
        match clipboard.write_text(&text).await {
            Ok(()) => debug!(len = text.len(), "Async clipboard write succeeded"),
            Err(e) => warn!(error = %e, "Async clipboard write rejected"),
        }
    });
}

/// In-process clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    reject: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that refuses every write, like a page without permission.
    pub fn rejecting() -> Self {
        Self {
            contents: Mutex::new(None),
            reject: true,
        }
    }

    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl AsyncClipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), SelpickError> {
        if self.reject {
            return Err(SelpickError::Clipboard("write permission denied".into()));
        }
        *self.contents.lock().await = Some(text.to_string());
        Ok(())
    }
}
