pub mod error;
pub mod message;
pub mod traits;
pub mod types;

pub use error::SelpickError;
pub use message::{Direction, Message};
pub use traits::{Component, Document};
pub use types::{ElementId, Point, Rect, TabId};
