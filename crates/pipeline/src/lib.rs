//! Multi-agent pipeline
//!
//! Runs the enabled agents strictly in order, threading each stage's
//! structured output into a merged [`StageInput`] for the next. The first
//! failing stage halts the run; stages already completed stay in the log.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use carbonroute_agent::{build_agent, Agent, AgentKind, LoopSettings, StageInput, TaskRequest};
use carbonroute_config::Config;
use carbonroute_data::{DataError, ReferenceData};
use carbonroute_provider::{OpenAiCompatProvider, Provider};

mod result;
pub mod stages;

pub use result::{ConversationEntry, PipelineResult};
pub use stages::resolve_stages;

/// Errors building an orchestrator
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("{0}")]
    Stage(String),

    #[error("the route stage cannot be disabled")]
    RouteRequired,
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Sequential coordinator over the enabled agents
pub struct Orchestrator {
    agents: Vec<Box<dyn Agent>>,
    data: Arc<ReferenceData>,
}

impl Orchestrator {
    /// Build the stages enabled in `config` over an existing provider and data set
    pub fn new(
        provider: Arc<dyn Provider>,
        data: Arc<ReferenceData>,
        config: &Config,
    ) -> Result<Self> {
        let stages = resolve_stages(&config.pipeline.stages)?;
        Ok(Self::with_stages(provider, data, &stages, config))
    }

    /// Build exactly `stages`, which must already be in canonical order
    pub fn with_stages(
        provider: Arc<dyn Provider>,
        data: Arc<ReferenceData>,
        stages: &[AgentKind],
        config: &Config,
    ) -> Self {
        let agents = stages
            .iter()
            .map(|&kind| {
                build_agent(
                    kind,
                    provider.clone(),
                    data.clone(),
                    LoopSettings::for_agent(kind, config),
                )
            })
            .collect();

        Self { agents, data }
    }

    /// Load reference data and connect to the configured model service.
    ///
    /// A missing credential is only warned about; agents then fail on
    /// their first model call.
    pub fn from_config(config: &Config) -> Result<Self> {
        let data = Arc::new(ReferenceData::load(config.data_dir())?);

        config.warn_if_unkeyed();
        let provider: Arc<dyn Provider> = Arc::new(OpenAiCompatProvider::new(
            config.api_key().unwrap_or_default(),
            Some(config.model.api_base.clone()),
            Some(config.model.model.clone()),
        ));

        let orchestrator = Self::new(provider, data, config)?;
        info!(
            "pipeline ready with stages: {}",
            orchestrator
                .stages()
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(orchestrator)
    }

    /// Enabled stages in execution order
    pub fn stages(&self) -> Vec<AgentKind> {
        self.agents.iter().map(|a| a.kind()).collect()
    }

    /// Shared reference data
    pub fn data(&self) -> &Arc<ReferenceData> {
        &self.data
    }

    /// Run every enabled stage for `request`
    pub async fn execute(&self, request: TaskRequest) -> PipelineResult {
        let run_id = Uuid::new_v4().to_string()[..8].to_string();
        let span = info_span!("pipeline", run = %run_id);
        self.run(run_id, request).instrument(span).await
    }

    async fn run(&self, run_id: String, request: TaskRequest) -> PipelineResult {
        info!(
            "optimizing {} -> {} ({} t, priority {})",
            request.origin(),
            request.destination(),
            request.weight(),
            request.priority()
        );

        let mut input = StageInput::new(request.clone());
        let mut log = Vec::with_capacity(self.agents.len());
        let mut recommendation = None;

        for agent in &self.agents {
            let kind = agent.kind();
            info!("{} agent starting", kind);

            let report = match agent.execute(&input).await {
                Ok(report) => report,
                Err(e) => {
                    error!("{} agent failed: {}", kind, e);
                    let message = format!("{} Agent failed: {}", kind.title(), e);
                    return PipelineResult::failed(run_id, request, log, &input, message);
                }
            };

            info!(
                "{} agent completed after {} model call(s)",
                kind, report.iterations
            );
            log.push(ConversationEntry::from_report(&report));

            if kind == AgentKind::Optimizer {
                recommendation = Some(report.data);
            } else {
                input.record(kind, report.data);
            }
        }

        let recommendation = recommendation.unwrap_or_else(|| result::combined(&input));
        info!("pipeline finished: {} stage(s)", log.len());
        PipelineResult::succeeded(run_id, request, log, recommendation)
    }
}
