//! HTTP surface for the routing pipeline

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use carbonroute_config::Config;
use carbonroute_pipeline::Orchestrator;

pub mod error;
pub mod handlers;

pub use error::ApiError;

/// Name reported by the banner and health endpoints
pub const SERVICE_NAME: &str = "Multi-Agent Carbon Routing API";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Build the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/optimize-route", post(handlers::optimize_route))
        .route("/health", get(handlers::health))
        .route("/available-locations", get(handlers::available_locations))
}

/// Bind `config.server` and serve until the process is interrupted
pub async fn serve(config: &Config, orchestrator: Orchestrator) -> std::io::Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, create_router(AppState::new(orchestrator)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
