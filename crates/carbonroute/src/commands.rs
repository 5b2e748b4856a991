//! carbonroute command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use carbonroute_agent::{Priority, TaskRequest};
use carbonroute_config::{self, Config};
use carbonroute_data::ReferenceData;
use carbonroute_pipeline::Orchestrator;

/// Load config and apply the `--data-dir` override
async fn load_config(data_dir: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load().await.context("failed to load config")?;
    if let Some(dir) = data_dir {
        config.data.dir = dir.to_string_lossy().into_owned();
    }
    Ok(config)
}

fn mark(ok: bool, yes: &'static str, no: &'static str) -> &'static str {
    if ok {
        yes
    } else {
        no
    }
}

/// Write the default config
pub async fn init_command() -> Result<()> {
    println!("◆ Initializing carbonroute...");

    let config = carbonroute_config::init()
        .await
        .context("failed to write config")?;

    println!("◆ Config at {}", carbonroute_config::config_path().display());
    println!("\nNext steps:");
    if !config.has_api_key() {
        println!(
            "  1. Set {} or model.api_key in the config",
            carbonroute_config::ENV_API_KEY
        );
    }
    println!("  - Try: carbonroute optimize -o Shanghai -d Berlin -w 10 -p carbon");
    println!("  - Serve the API: carbonroute serve");

    Ok(())
}

/// Start the HTTP API
pub async fn serve_command(data_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(data_dir).await?;
    let orchestrator =
        Orchestrator::from_config(&config).context("failed to build the pipeline")?;

    println!("◆ Starting carbonroute API");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Listening on http://{}", config.bind_addr());
    println!("Press Ctrl+C to stop");

    carbonroute_server::serve(&config, orchestrator)
        .await
        .with_context(|| format!("server on {} failed", config.bind_addr()))?;

    info!("◆ Server stopped");
    Ok(())
}

/// Run the pipeline once and print the result
pub async fn optimize_command(
    data_dir: Option<PathBuf>,
    origin: String,
    destination: String,
    weight: f64,
    priority: String,
) -> Result<()> {
    let priority: Priority = priority.parse()?;
    let request = TaskRequest::new(origin, destination, weight, priority)?;

    let config = load_config(data_dir).await?;
    let orchestrator =
        Orchestrator::from_config(&config).context("failed to build the pipeline")?;

    let result = orchestrator.execute(request).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    match result.error {
        Some(error) if !result.success => anyhow::bail!(error),
        _ => Ok(()),
    }
}

/// List the locations in the reference data
pub async fn locations_command(data_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(data_dir).await?;
    let data = ReferenceData::load(config.data_dir()).context("failed to load reference data")?;

    let names = data.location_names();
    println!("◆ {} known locations", names.len());
    for name in &names {
        match data.location(name) {
            Some(loc) => println!("  {} ({}, {})", name, loc.country, loc.region),
            None => println!("  {}", name),
        }
    }

    Ok(())
}

/// Show status
pub async fn status_command(data_dir: Option<PathBuf>) -> Result<()> {
    let config_path = carbonroute_config::config_path();
    let config = load_config(data_dir).await?;
    let data_path = config.data_dir();

    println!("◆ carbonroute Status");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "Config:   {} {}",
        config_path.display(),
        mark(config_path.exists(), "[OK]", "[Missing]")
    );
    println!(
        "Data:     {} {}",
        data_path.display(),
        mark(data_path.is_dir(), "[OK]", "[Missing]")
    );
    println!("Model:    {}", config.model.model);
    println!(
        "API Key:  {}",
        mark(config.has_api_key(), "[Set]", "[Missing]")
    );
    println!("Stages:   {}", config.pipeline.stages.join(", "));
    println!("Server:   {}", config.bind_addr());

    if !config.has_api_key() {
        warn!("agents will fail until an API key is configured");
    }

    println!("\n◆ Ready");
    Ok(())
}
