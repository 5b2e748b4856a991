//! Endpoint handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::{info, instrument};

use carbonroute_agent::TaskRequest;
use carbonroute_pipeline::PipelineResult;

use crate::error::ApiError;
use crate::{AppState, SERVICE_NAME};

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/health"
    }))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let agents: Vec<&str> = state
        .orchestrator
        .stages()
        .into_iter()
        .map(|k| k.as_str())
        .collect();

    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "agents": agents
    }))
}

/// `GET /api/available-locations`
pub async fn available_locations(State(state): State<AppState>) -> Json<Value> {
    let locations = state.orchestrator.data().location_names();
    Json(json!({
        "count": locations.len(),
        "locations": locations
    }))
}

/// `POST /api/optimize-route`
///
/// Pipeline failures are reported in the body with `success = false`;
/// only malformed requests are rejected.
#[instrument(skip_all)]
pub async fn optimize_route(
    State(state): State<AppState>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<PipelineResult>, ApiError> {
    let Json(request) = body?;
    info!(
        "optimize-route {} -> {} ({})",
        request.origin(),
        request.destination(),
        request.priority()
    );

    let result = state.orchestrator.execute(request).await;
    Ok(Json(result))
}
