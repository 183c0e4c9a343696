//! Selector Event Logger
//!
//! Outcomes reported by pages, written to the `selector_events` target.

use chrono::{DateTime, Utc};
use selpick_core::{Message, TabId};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectorEvent {
    Generated { selector: String },
    GenerationFailed,
    ClipboardFailed { reason: String },
}

impl SelectorEvent {
    /// The event a page-to-background message reports, if any.
    pub fn from_message(message: &Message) -> Option<Self> {
        match message {
            Message::SelectorGenerated { selector } => Some(SelectorEvent::Generated {
                selector: selector.clone(),
            }),
            Message::SelectorGenerationFailed => Some(SelectorEvent::GenerationFailed),
            Message::GetSelector | Message::EnableInspectMode => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventLogEntry {
    pub tab_id: Option<TabId>,
    pub timestamp: DateTime<Utc>,
    pub event: SelectorEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Log a selector event and hand back the entry that was written.
    pub fn log_event(tab_id: Option<TabId>, event: SelectorEvent) -> EventLogEntry {
        let entry = EventLogEntry {
            tab_id,
            timestamp: Utc::now(),
            event,
        };

        info!(target: "selector_events", event = ?entry, "Selector event");
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_from_messages() {
        assert_eq!(
            SelectorEvent::from_message(&Message::SelectorGenerated {
                selector: "#app".into()
            }),
            Some(SelectorEvent::Generated {
                selector: "#app".into()
            })
        );
        assert_eq!(
            SelectorEvent::from_message(&Message::SelectorGenerationFailed),
            Some(SelectorEvent::GenerationFailed)
        );
        assert_eq!(SelectorEvent::from_message(&Message::GetSelector), None);
    }

    #[test]
    fn test_entry_serializes_as_tagged_record() {
        let entry = EventLogger::log_event(
            Some(TabId(7)),
            SelectorEvent::Generated {
                selector: "#app".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["tab_id"], 7);
        assert_eq!(json["event"]["type"], "generated");
        assert_eq!(json["event"]["selector"], "#app");
        assert!(json["timestamp"].is_string());
    }
}
