use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_SYSTEM.to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ROLE_ASSISTANT.to_string(),
            content: content.into(),
        }
    }
}

/// One structured assistant turn. Exactly one of `tool_calls` / `response`
/// is populated, matching `action` ("tool_call" or "final_response").
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StructuredReply {
    #[serde(default)]
    pub thinking: String,
    #[serde(default)]
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
}

pub const ACTION_TOOL_CALL: &str = "tool_call";
pub const ACTION_FINAL_RESPONSE: &str = "final_response";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Clone, Debug)]
pub struct ToolResult {
    pub tool: String,
    pub result: String,
}

impl ToolResult {
    /// Render a batch of results the way the model expects them back:
    /// `"tool: result; tool: result"`.
    pub fn summarize(results: &[ToolResult]) -> String {
        results
            .iter()
            .map(|r| format!("{}: {}", r.tool, r.result))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
