//! Optimizer agent tools
//!
//! Built per run from the joined candidate set so the model can consult
//! the same scoring the fallback uses.

use serde::Deserialize;
use serde_json::{json, Value};

use carbonroute_provider::{object_schema, Param, Tool};

use super::{ToolError, Toolkit};
use crate::scoring::{rank, trade_offs, Candidate, Weights};
use crate::types::Priority;

#[derive(Debug, Deserialize)]
#[serde(tag = "tool", content = "args", rename_all = "snake_case")]
pub enum OptimizerTool {
    ScoreRoutes(ScoreArgs),
    SummarizeTradeOffs(NoArgs),
}

#[derive(Debug, Deserialize)]
pub struct ScoreArgs {
    #[serde(default)]
    pub priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
pub struct NoArgs {}

pub struct OptimizerToolkit {
    candidates: Vec<Candidate>,
    priority: Priority,
}

impl OptimizerToolkit {
    pub fn new(candidates: Vec<Candidate>, priority: Priority) -> Self {
        Self {
            candidates,
            priority,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Candidates ranked under `priority`, best first
    pub fn ranked(&self, priority: Priority) -> Vec<Candidate> {
        rank(self.candidates.clone(), priority)
    }
}

impl Toolkit for OptimizerToolkit {
    type Call = OptimizerTool;

    fn definitions(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                "score_routes",
                "Rank the candidate routes with the weighted cost/time/emissions score",
                object_schema(vec![Param::string(
                    "priority",
                    "cost, speed, carbon, or balanced; defaults to the request priority",
                )
                .optional()]),
            ),
            Tool::new(
                "summarize_trade_offs",
                "Cost, time and emission ranges for the top-ranked route versus the rest",
                object_schema(vec![]),
            ),
        ]
    }

    fn run(&self, call: OptimizerTool) -> Result<Value, ToolError> {
        match call {
            OptimizerTool::ScoreRoutes(args) => {
                let priority = args.priority.unwrap_or(self.priority);
                Ok(json!({
                    "priority": priority,
                    "weights": Weights::for_priority(priority),
                    "ranked": self.ranked(priority)
                }))
            }
            OptimizerTool::SummarizeTradeOffs(_) => {
                match trade_offs(&self.ranked(self.priority)) {
                    Some(analysis) => Ok(json!(analysis)),
                    None => Err(ToolError::not_found("No candidate routes")),
                }
            }
        }
    }
}
