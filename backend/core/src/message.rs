use serde::{Deserialize, Serialize};

/// One-way notifications exchanged between the background context and a page.
///
/// The wire shape is a record tagged by `action`, e.g.
/// `{"action":"selectorGenerated","selector":"#app"}`. No message expects a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    /// Background → page: synthesize a selector for the last right-clicked element.
    GetSelector,
    /// Background → page: enter inspect mode.
    EnableInspectMode,
    /// Page → background: a selector was produced and copied.
    SelectorGenerated { selector: String },
    /// Page → background: no unique selector could be produced.
    SelectorGenerationFailed,
}

/// Which context a message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ToPage,
    ToBackground,
}

impl Message {
    pub fn direction(&self) -> Direction {
        match self {
            Message::GetSelector | Message::EnableInspectMode => Direction::ToPage,
            Message::SelectorGenerated { .. } | Message::SelectorGenerationFailed => {
                Direction::ToBackground
            }
        }
    }

    /// Wire name of the message kind.
    pub fn action(&self) -> &'static str {
        match self {
            Message::GetSelector => "getSelector",
            Message::EnableInspectMode => "enableInspectMode",
            Message::SelectorGenerated { .. } => "selectorGenerated",
            Message::SelectorGenerationFailed => "selectorGenerationFailed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_matches_extension_protocol() {
        let json = serde_json::to_value(Message::SelectorGenerated {
            selector: "#app".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"action": "selectorGenerated", "selector": "#app"})
        );

        let json = serde_json::to_string(&Message::GetSelector).unwrap();
        assert_eq!(json, r#"{"action":"getSelector"}"#);
    }

    #[test]
    fn test_parse_from_host_payload() {
        let msg: Message = serde_json::from_str(r#"{"action":"enableInspectMode"}"#).unwrap();
        assert_eq!(msg, Message::EnableInspectMode);

        let msg: Message =
            serde_json::from_str(r#"{"action":"selectorGenerationFailed"}"#).unwrap();
        assert_eq!(msg.direction(), Direction::ToBackground);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result: Result<Message, _> = serde_json::from_str(r#"{"action":"explode"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_action_names_agree_with_serde() {
        for msg in [
            Message::GetSelector,
            Message::EnableInspectMode,
            Message::SelectorGenerated { selector: "a".into() },
            Message::SelectorGenerationFailed,
        ] {
            let value = serde_json::to_value(&msg).unwrap();
            assert_eq!(value["action"], msg.action());
        }
    }
}
