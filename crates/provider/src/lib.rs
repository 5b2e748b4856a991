//! Hosted model access
//!
//! The `Provider` trait is the single capability the agents need from a
//! language model: send a conversation plus tool schema, get back either
//! text or tool invocations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use thiserror::Error;

pub mod compat;
pub mod scripted;

pub use compat::OpenAiCompatProvider;
pub use scripted::{ScriptStep, ScriptedProvider};

/// Model service errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid JSON from model service: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model service rejected request: {0}")]
    Api(String),

    #[error("no API key configured")]
    NoApiKey,

    #[error("malformed model reply")]
    InvalidResponse,

    #[error("rate limited by model service")]
    RateLimited,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Model reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub finish_reason: String,
    #[serde(default)]
    pub usage: Usage,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            finish_reason: "stop".to_string(),
            usage: Usage::default(),
        }
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls: calls,
            finish_reason: "tool_calls".to_string(),
            usage: Usage::default(),
        }
    }
}

/// Token accounting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Conversation entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    fn with_role(role: &str, content: Option<String>) -> Self {
        Self {
            role: role.to_string(),
            content,
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role("system", Some(content.into()))
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role("user", Some(content.into()))
    }

    /// Assistant turn that requested tools
    pub fn assistant_tool_calls(content: Option<String>, calls: &[ToolCall]) -> Self {
        let mut msg = Self::with_role("assistant", content);
        msg.tool_calls = Some(
            calls
                .iter()
                .map(|c| ToolCallDef::new(&c.id, &c.name, c.arguments.clone()))
                .collect(),
        );
        msg
    }

    pub fn tool(
        call_id: impl Into<String>,
        name: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        let mut msg = Self::with_role("tool", Some(result.into()));
        msg.tool_call_id = Some(call_id.into());
        msg.name = Some(name.into());
        msg
    }
}

/// Tool call as echoed back in conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallDef {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

impl ToolCallDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Value,
}

/// Tool declaration offered to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDef,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Request parameters
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Vec<Tool>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            messages: Vec::new(),
            tools: Vec::new(),
            max_tokens: 4096,
            temperature: 0.1,
        }
    }
}

/// A hosted language model
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse>;
    fn is_configured(&self) -> bool;
}

/// JSON schema primitive for a tool argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Object,
}

impl ParamKind {
    fn as_str(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Object => "object",
        }
    }
}

/// One argument in a tool schema
#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
    pub required: bool,
}

impl Param {
    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::String,
            description,
            required: true,
        }
    }

    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self {
            kind: ParamKind::Number,
            ..Self::string(name, description)
        }
    }

    pub fn object(name: &'static str, description: &'static str) -> Self {
        Self {
            kind: ParamKind::Object,
            ..Self::string(name, description)
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Build a JSON object schema from typed parameters
pub fn object_schema(params: Vec<Param>) -> Value {
    let mut props = serde_json::Map::new();
    let mut required = Vec::new();

    for param in params {
        props.insert(
            param.name.to_string(),
            serde_json::json!({
                "type": param.kind.as_str(),
                "description": param.description
            }),
        );
        if param.required {
            required.push(param.name);
        }
    }

    serde_json::json!({
        "type": "object",
        "properties": props,
        "required": required
    })
}
