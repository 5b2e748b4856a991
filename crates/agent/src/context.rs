//! Context builder for assembling agent conversations

use serde_json::{json, Value};

use carbonroute_provider::{Message, ToolCall};

/// Builds the opening turns (role prompt + task) and appends later turns
pub struct ContextBuilder {
    system_prompt: String,
}

impl ContextBuilder {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// First turn: system prompt followed by the task
    pub fn build_messages(&self, task: &str) -> Vec<Message> {
        vec![Message::system(&self.system_prompt), Message::user(task)]
    }

    /// Add the assistant turn that requested tools
    pub fn add_assistant_message(
        messages: &mut Vec<Message>,
        content: Option<&str>,
        tool_calls: &[ToolCall],
    ) {
        let content = content.filter(|c| !c.is_empty()).map(str::to_string);
        messages.push(Message::assistant_tool_calls(content, tool_calls));
    }

    /// Add a tool result, wrapped as `{"result": ...}`
    pub fn add_tool_result(messages: &mut Vec<Message>, tool_call_id: &str, name: &str, result: &Value) {
        let body = json!({ "result": result });
        messages.push(Message::tool(tool_call_id, name, body.to_string()));
    }
}

/// Pretty JSON for task prompts
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
