//! Route, Carbon, Policy and Optimizer agents
//!
//! Each agent wraps a bounded tool-calling conversation with the hosted
//! model, a closed menu of deterministic tools over the reference data,
//! and a lenient extraction of the model's final answer.

use thiserror::Error;

pub mod agents;
pub mod context;
pub mod conversation;
pub mod extract;
pub mod scoring;
pub mod tools;
pub mod types;

pub use agents::{build_agent, Agent, CarbonAgent, OptimizerAgent, PolicyAgent, RouteAgent};
pub use context::ContextBuilder;
pub use conversation::{Completion, ConversationLoop, LoopSettings};
pub use extract::{extract, Extraction, ExtractionKind};
pub use tools::{ToolError, Toolkit};
pub use types::{AgentKind, AgentReport, Priority, RequestError, StageInput, TaskRequest};

/// Agent failures surfaced to the orchestrator
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("{0}")]
    Provider(String),

    #[error("Max iterations reached ({0})")]
    MaxIterations(u32),

    #[error("missing input: {0}")]
    MissingInput(&'static str),
}

pub type Result<T> = std::result::Result<T, AgentError>;
