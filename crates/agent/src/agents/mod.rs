//! The four pipeline agents
//!
//! Each agent owns its role prompt, builds a task prompt from the merged
//! [`StageInput`], runs a [`ConversationLoop`] over its toolkit and shapes
//! the final reply into its stage output.

mod carbon;
mod optimizer;
mod policy;
mod route;

pub use carbon::CarbonAgent;
pub use optimizer::OptimizerAgent;
pub use policy::PolicyAgent;
pub use route::RouteAgent;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use carbonroute_data::ReferenceData;
use carbonroute_provider::Provider;

use crate::context::ContextBuilder;
use crate::conversation::{Completion, ConversationLoop, LoopSettings};
use crate::extract::{extract, Extraction};
use crate::tools::Toolkit;
use crate::types::{AgentKind, AgentReport, StageInput};
use crate::Result;

/// A pipeline stage backed by the model
#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    async fn execute(&self, input: &StageInput) -> Result<AgentReport>;
}

/// Construct the agent for `kind`
pub fn build_agent(
    kind: AgentKind,
    provider: Arc<dyn Provider>,
    data: Arc<ReferenceData>,
    settings: LoopSettings,
) -> Box<dyn Agent> {
    match kind {
        AgentKind::Route => Box::new(RouteAgent::new(provider, data, settings)),
        AgentKind::Carbon => Box::new(CarbonAgent::new(provider, data, settings)),
        AgentKind::Policy => Box::new(PolicyAgent::new(provider, data, settings)),
        AgentKind::Optimizer => Box::new(OptimizerAgent::new(provider, settings)),
    }
}

/// Run one conversation for `kind`
async fn converse<T: Toolkit>(
    kind: AgentKind,
    provider: &dyn Provider,
    toolkit: &T,
    settings: &LoopSettings,
    system_prompt: &str,
    task: &str,
) -> Result<Completion> {
    let context = ContextBuilder::new(system_prompt);
    ConversationLoop::new(kind, provider, toolkit, settings)
        .run(&context, task)
        .await
}

/// Extract the reply and package it, shaping unstructured text with `fallback`
fn into_report<F>(kind: AgentKind, completion: Completion, fallback: F) -> AgentReport
where
    F: FnOnce(String) -> Value,
{
    let extraction = extract(&completion.text);
    if let Extraction::Unstructured(_) = extraction {
        warn!("{} agent reply had no JSON object, using fallback shape", kind);
    }

    let kind_tag = extraction.kind();
    AgentReport {
        agent: kind,
        data: extraction.into_data(fallback),
        raw_response: completion.text,
        iterations: completion.iterations,
        extraction: kind_tag,
    }
}
