use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::role::Role;
use super::tool::ToolCall;
use crate::errors::AgentResult;

/// The model's request to invoke a tool. A request that could not be decoded
/// from the wire (invalid function name, undecodable arguments) is carried as
/// `Err` so the orchestrator can reject it instead of the wire layer crashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub id: String,
    pub tool_call: AgentResult<ToolCall>,
}

/// The synthesized outcome of a tool invocation, folded back into the
/// conversation as a tool-role message. The summary is human-readable prose,
/// never a raw payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub id: String,
    pub tool_name: String,
    pub summary: String,
}

/// Content carried inside a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageContent {
    Text(String),
    ToolRequest(ToolRequest),
    ToolResult(ToolResult),
}

impl MessageContent {
    pub fn text<S: Into<String>>(text: S) -> Self {
        MessageContent::Text(text.into())
    }

    pub fn tool_request<S: Into<String>>(id: S, tool_call: AgentResult<ToolCall>) -> Self {
        MessageContent::ToolRequest(ToolRequest {
            id: id.into(),
            tool_call,
        })
    }

    pub fn tool_result<S, T, U>(id: S, tool_name: T, summary: U) -> Self
    where
        S: Into<String>,
        T: Into<String>,
        U: Into<String>,
    {
        MessageContent::ToolResult(ToolResult {
            id: id.into(),
            tool_name: tool_name.into(),
            summary: summary.into(),
        })
    }

    /// Get the text if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_request(&self) -> Option<&ToolRequest> {
        if let MessageContent::ToolRequest(ref tool_request) = self {
            Some(tool_request)
        } else {
            None
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        if let MessageContent::ToolResult(ref tool_result) = self {
            Some(tool_result)
        } else {
            None
        }
    }
}

/// A message to or from the model. An ordered sequence of these forms the
/// conversation; order is the model's entire context and must never be
/// reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: Vec<MessageContent>,
}

impl Message {
    fn new(role: Role) -> Self {
        Message {
            role,
            created: Utc::now().timestamp(),
            content: Vec::new(),
        }
    }

    /// Create a new user message with the current timestamp
    pub fn user() -> Self {
        Self::new(Role::User)
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant() -> Self {
        Self::new(Role::Assistant)
    }

    /// Create a new tool message with the current timestamp
    pub fn tool() -> Self {
        Self::new(Role::Tool)
    }

    /// Add any MessageContent to the message
    pub fn with_content(mut self, content: MessageContent) -> Self {
        self.content.push(content);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(MessageContent::text(text))
    }

    /// Add a tool request to the message
    pub fn with_tool_request<S: Into<String>>(
        self,
        id: S,
        tool_call: AgentResult<ToolCall>,
    ) -> Self {
        self.with_content(MessageContent::tool_request(id, tool_call))
    }

    /// Add a tool result to the message
    pub fn with_tool_result<S, T, U>(self, id: S, tool_name: T, summary: U) -> Self
    where
        S: Into<String>,
        T: Into<String>,
        U: Into<String>,
    {
        self.with_content(MessageContent::tool_result(id, tool_name, summary))
    }

    /// All text content of the message, joined with newlines. Empty when the
    /// message carries no text.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|content| content.as_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The first tool request in the message, if any
    pub fn first_tool_request(&self) -> Option<&ToolRequest> {
        self.content
            .iter()
            .find_map(|content| content.as_tool_request())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_builders() {
        let message = Message::user().with_text("hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text(), "hello");
        assert!(message.first_tool_request().is_none());
    }

    #[test]
    fn test_first_tool_request_skips_text() {
        let message = Message::assistant()
            .with_text("thinking")
            .with_tool_request("1", Ok(ToolCall::new("get_weather", json!({"city": "Oslo"}))))
            .with_tool_request("2", Ok(ToolCall::new("get_population", json!({"city": "Oslo"}))));

        let request = message.first_tool_request().unwrap();
        assert_eq!(request.id, "1");
        assert_eq!(request.tool_call.as_ref().unwrap().name, "get_weather");
    }

    #[test]
    fn test_tool_message_carries_summary() {
        let message = Message::tool().with_tool_result("1", "get_weather", "sunny");
        let result = message.content[0].as_tool_result().unwrap();
        assert_eq!(result.tool_name, "get_weather");
        assert_eq!(result.summary, "sunny");
        assert_eq!(message.text(), "");
    }
}
