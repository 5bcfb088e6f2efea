//! Message and Conversation domain types.
//!
//! A [`Conversation`] holds everything the model sees during one chat
//! request: the prior turns, the unsent user turn, and the tool-use turns the
//! agent loop appends while it works.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// Tool execution result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Create an assistant turn that requested tool calls.
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<MessageToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::assistant(content)
        }
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool call embedded in an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// The model's own ID for this tool call
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Parsed arguments
    pub arguments: serde_json::Value,
}

/// Conversation state for a single chat request.
///
/// `input` is never part of `history`. Both `history` and `scratchpad` are
/// append-only while the request runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Prior user and assistant turns, oldest first
    pub history: Vec<Message>,

    /// The current, not yet answered user turn
    pub input: String,

    /// Assistant tool-use turns and tool results produced during this request
    #[serde(default)]
    pub scratchpad: Vec<Message>,
}

impl Conversation {
    /// Build the state from the caller's turns.
    ///
    /// Turns with roles other than user or assistant are skipped. The last
    /// user turn becomes the input; when it is also the final turn it is
    /// removed from history.
    pub fn from_turns<I, S>(turns: I) -> Self
    where
        I: IntoIterator<Item = (Role, S)>,
        S: Into<String>,
    {
        let mut history = Vec::new();
        let mut input = String::new();

        for (role, content) in turns {
            let content = content.into();
            match role {
                Role::User => {
                    input.clone_from(&content);
                    history.push(Message::user(content));
                }
                Role::Assistant => history.push(Message::assistant(content)),
                Role::Tool => {}
            }
        }

        if history.last().is_some_and(|m| m.role == Role::User) {
            history.pop();
        }

        Self {
            history,
            input,
            scratchpad: Vec::new(),
        }
    }

    /// Append a turn produced during this request.
    pub fn push_scratch(&mut self, message: Message) {
        self.scratchpad.push(message);
    }

    /// The full message list sent to the model: history, input, scratchpad.
    pub fn transcript(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 1 + self.scratchpad.len());
        messages.extend(self.history.iter().cloned());
        messages.push(Message::user(self.input.clone()));
        messages.extend(self.scratchpad.iter().cloned());
        messages
    }
}
