//! Bounded tool-calling conversation with the model

use tracing::{debug, info};

use carbonroute_config::{AgentLimits, Config};
use carbonroute_provider::{ChatParams, Provider};

use crate::context::ContextBuilder;
use crate::tools::Toolkit;
use crate::types::AgentKind;
use crate::{AgentError, Result};

/// Model parameters and iteration cap for one agent
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    pub model: String,
    pub max_iterations: u32,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LoopSettings {
    pub fn new(model: impl Into<String>, limits: AgentLimits, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_iterations: limits.max_iterations,
            temperature: limits.temperature,
            max_tokens,
        }
    }

    /// Settings for `kind` from the loaded config
    pub fn for_agent(kind: AgentKind, config: &Config) -> Self {
        let limits = match kind {
            AgentKind::Route => config.agents.route,
            AgentKind::Carbon => config.agents.carbon,
            AgentKind::Policy => config.agents.policy,
            AgentKind::Optimizer => config.agents.optimizer,
        };
        Self::new(&config.model.model, limits, config.model.max_tokens)
    }
}

/// Final reply of a finished conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    /// Model calls made, including the final one
    pub iterations: u32,
}

/// One conversation: role prompt, task, tool menu
pub struct ConversationLoop<'a, T: Toolkit> {
    agent: AgentKind,
    provider: &'a dyn Provider,
    toolkit: &'a T,
    settings: &'a LoopSettings,
}

impl<'a, T: Toolkit> ConversationLoop<'a, T> {
    pub fn new(
        agent: AgentKind,
        provider: &'a dyn Provider,
        toolkit: &'a T,
        settings: &'a LoopSettings,
    ) -> Self {
        Self {
            agent,
            provider,
            toolkit,
            settings,
        }
    }

    /// Drive the model until it answers without requesting tools
    ///
    /// Every model call counts as one iteration. A model that keeps asking
    /// for tools is called exactly `max_iterations` times before the run
    /// fails with [`AgentError::MaxIterations`]. Provider errors end the run
    /// immediately.
    pub async fn run(&self, context: &ContextBuilder, task: &str) -> Result<Completion> {
        let mut messages = context.build_messages(task);
        let tools = self.toolkit.definitions();
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.settings.max_iterations {
                return Err(AgentError::MaxIterations(self.settings.max_iterations));
            }

            debug!(
                "{} agent iteration {}/{}",
                self.agent, iteration, self.settings.max_iterations
            );

            let params = ChatParams {
                model: self.settings.model.clone(),
                messages: messages.clone(),
                tools: tools.clone(),
                max_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            };

            let response = self
                .provider
                .chat(params)
                .await
                .map_err(|e| AgentError::Provider(e.to_string()))?;

            debug!(
                "{} agent used {} tokens ({} prompt, {} completion)",
                self.agent,
                response.usage.total_tokens,
                response.usage.prompt_tokens,
                response.usage.completion_tokens
            );

            if !response.has_tool_calls() {
                info!("{} agent finished after {} iterations", self.agent, iteration);
                return Ok(Completion {
                    text: response.content.unwrap_or_default(),
                    iterations: iteration,
                });
            }

            ContextBuilder::add_assistant_message(
                &mut messages,
                response.content.as_deref(),
                &response.tool_calls,
            );

            for call in &response.tool_calls {
                debug!("{} agent calling {}", self.agent, call.name);
                let result = self.toolkit.dispatch(call);
                ContextBuilder::add_tool_result(&mut messages, &call.id, &call.name, &result);
            }
        }
    }
}
