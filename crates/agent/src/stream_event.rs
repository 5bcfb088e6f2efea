//! Events streamed to the caller while a chat request runs.

use serde::{Deserialize, Serialize};

/// One line of the chat response stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A piece of assistant text, forwarded as soon as it arrives.
    Text { content: String },

    /// A completed tool invocation. `id` is a fresh correlation id, not the
    /// model's own call id.
    ToolCall {
        id: String,
        name: String,
        args: serde_json::Value,
        output: serde_json::Value,
    },

    /// The request failed. Always followed by `finish`.
    Error { error: String },

    /// Terminates every stream.
    Finish,
}

impl AgentEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::ToolCall { .. } => "tool_call",
            Self::Error { .. } => "error",
            Self::Finish => "finish",
        }
    }

    pub fn is_finish(&self) -> bool {
        matches!(self, Self::Finish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_serialization() {
        let event = AgentEvent::Text { content: "Done.".into() };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"text","content":"Done."}"#);
    }

    #[test]
    fn tool_call_serialization() {
        let event = AgentEvent::ToolCall {
            id: "c0ffee".into(),
            name: "moveObject".into(),
            args: serde_json::json!({"id": "o1", "x": 5, "y": 6}),
            output: serde_json::json!({"action": "update", "id": "o1", "updates": {"x": 5, "y": 6}}),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "tool_call");
        assert_eq!(value["name"], "moveObject");
        assert_eq!(value["args"]["x"], 5);
        assert_eq!(value["output"]["action"], "update");
    }

    #[test]
    fn error_and_finish_serialization() {
        let error = AgentEvent::Error { error: "boom".into() };
        assert_eq!(serde_json::to_string(&error).unwrap(), r#"{"type":"error","error":"boom"}"#);
        assert_eq!(serde_json::to_string(&AgentEvent::Finish).unwrap(), r#"{"type":"finish"}"#);
    }

    #[test]
    fn deserializes_from_wire() {
        let event: AgentEvent = serde_json::from_str(r#"{"type":"finish"}"#).unwrap();
        assert!(event.is_finish());
        assert_eq!(event.event_type(), "finish");
    }
}
