pub mod clipboard;
pub mod controller;
pub mod memory;
pub mod surface;

pub use clipboard::{AsyncClipboard, MemoryClipboard};
pub use controller::{Dispatch, InspectController, PageEvent};
pub use memory::MemoryPage;
pub use surface::{Injected, ListenerId, ListenerKind, NodeHandle, Page, PageChrome, TimerTask};
