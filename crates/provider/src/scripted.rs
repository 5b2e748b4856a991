//! Scripted provider
//!
//! Replays a fixed sequence of replies and records every request it
//! receives. Used for deterministic pipeline runs and tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{ChatParams, ChatResponse, Provider, ProviderError, Result, ToolCall};

/// One scripted turn
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Reply(ChatResponse),
    Fail(String),
}

impl ScriptStep {
    pub fn text(content: impl Into<String>) -> Self {
        ScriptStep::Reply(ChatResponse::text(content))
    }

    pub fn call(id: impl Into<String>, name: impl Into<String>, args: serde_json::Value) -> Self {
        ScriptStep::Reply(ChatResponse::tool_calls(vec![ToolCall::new(id, name, args)]))
    }

    pub fn calls(calls: Vec<ToolCall>) -> Self {
        ScriptStep::Reply(ChatResponse::tool_calls(calls))
    }

    pub fn fail(message: impl Into<String>) -> Self {
        ScriptStep::Fail(message.into())
    }
}

/// Provider that answers from a script
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<ScriptStep>>,
    repeat: Option<ScriptStep>,
    requests: Mutex<Vec<ChatParams>>,
}

impl ScriptedProvider {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with the same step, forever
    pub fn repeating(step: ScriptStep) -> Self {
        Self {
            repeat: Some(step),
            ..Self::default()
        }
    }

    /// Number of chat calls received so far
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Copies of every request received, in order
    pub fn requests(&self) -> Vec<ChatParams> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Steps not yet consumed
    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(params);

        let next = self
            .steps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .or_else(|| self.repeat.clone());

        match next {
            Some(ScriptStep::Reply(response)) => Ok(response),
            Some(ScriptStep::Fail(message)) => Err(ProviderError::Api(message)),
            None => Err(ProviderError::Api("script exhausted".to_string())),
        }
    }

    fn is_configured(&self) -> bool {
        true
    }
}
