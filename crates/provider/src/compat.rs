//! OpenAI-compatible chat completions client
//!
//! Works against any `/chat/completions` endpoint that speaks the OpenAI
//! function-calling dialect (Gemini's compatibility endpoint, OpenRouter,
//! OpenAI itself).

use crate::*;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, trace};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Chat completions over HTTP
pub struct OpenAiCompatProvider {
    client: Client,
    api_key: String,
    api_base: String,
    default_model: String,
}

impl OpenAiCompatProvider {
    pub fn new(
        api_key: impl Into<String>,
        api_base: Option<String>,
        default_model: Option<String>,
    ) -> Self {
        let api_base = api_base
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            default_model: default_model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn build_request(&self, params: &ChatParams) -> serde_json::Value {
        let model = if params.model.is_empty() {
            self.default_model.clone()
        } else {
            params.model.clone()
        };

        let messages: Vec<serde_json::Value> = params
            .messages
            .iter()
            .map(|m| {
                let mut obj = json!({ "role": &m.role });
                if let Some(content) = &m.content {
                    obj["content"] = json!(content);
                }
                if let Some(tool_calls) = &m.tool_calls {
                    // the wire format carries arguments as a JSON string
                    let calls: Vec<serde_json::Value> = tool_calls
                        .iter()
                        .map(|c| {
                            json!({
                                "id": &c.id,
                                "type": &c.call_type,
                                "function": {
                                    "name": &c.function.name,
                                    "arguments": c.function.arguments.to_string()
                                }
                            })
                        })
                        .collect();
                    obj["tool_calls"] = json!(calls);
                }
                if let Some(tool_call_id) = &m.tool_call_id {
                    obj["tool_call_id"] = json!(tool_call_id);
                }
                if let Some(name) = &m.name {
                    obj["name"] = json!(name);
                }
                obj
            })
            .collect();

        let mut body = json!({
            "model": model,
            "messages": messages,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        });

        if !params.tools.is_empty() {
            let tools: Vec<serde_json::Value> = params
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": &t.function.name,
                            "description": &t.function.description,
                            "parameters": &t.function.parameters
                        }
                    })
                })
                .collect();

            body["tools"] = json!(tools);
            body["tool_choice"] = json!("auto");
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<ChatResponse> {
        let choice = json["choices"]
            .get(0)
            .ok_or(ProviderError::InvalidResponse)?;
        let message = choice
            .get("message")
            .filter(|m| m.is_object())
            .ok_or(ProviderError::InvalidResponse)?;
        let content = message["content"].as_str().map(|s| s.to_string());
        let finish_reason = choice["finish_reason"]
            .as_str()
            .unwrap_or("stop")
            .to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for (index, call) in calls.iter().enumerate() {
                let function = &call["function"];
                let Some(name) = function["name"].as_str().filter(|n| !n.is_empty()) else {
                    continue;
                };
                let args = function["arguments"]
                    .as_str()
                    .and_then(|s| serde_json::from_str(s).ok())
                    .unwrap_or_else(|| function["arguments"].clone());

                // some compatible endpoints omit call ids
                let id = call["id"]
                    .as_str()
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("call_{}", index));

                tool_calls.push(ToolCall {
                    id,
                    name: name.to_string(),
                    arguments: args,
                });
            }
        }

        let usage = if let Some(usage) = json["usage"].as_object() {
            let field = |key: &str| usage.get(key).and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            Usage {
                prompt_tokens: field("prompt_tokens"),
                completion_tokens: field("completion_tokens"),
                total_tokens: field("total_tokens"),
            }
        } else {
            Usage::default()
        };

        Ok(ChatResponse {
            content,
            tool_calls,
            finish_reason,
            usage,
        })
    }

    fn status_error(status: u16, json: &serde_json::Value) -> ProviderError {
        if status == 429 {
            return ProviderError::RateLimited;
        }
        let error = json["error"]["message"]
            .as_str()
            .or_else(|| json[0]["error"]["message"].as_str())
            .unwrap_or("unknown error")
            .to_string();
        ProviderError::Api(error)
    }
}

#[async_trait::async_trait]
impl Provider for OpenAiCompatProvider {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse> {
        if !self.is_configured() {
            return Err(ProviderError::NoApiKey);
        }

        trace!("sending chat request to {}", self.api_base);

        let url = format!("{}/chat/completions", self.api_base);
        let body = self.build_request(&params);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let json: serde_json::Value = response.json().await?;

        if !status.is_success() {
            return Err(Self::status_error(status.as_u16(), &json));
        }

        debug!(
            "model replied with {} tool calls",
            json["choices"][0]["message"]["tool_calls"]
                .as_array()
                .map(|v| v.len())
                .unwrap_or(0)
        );

        self.parse_response(json)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
