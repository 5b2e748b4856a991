//! carbonroute - carbon-aware shipping route recommendations

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    init_command, locations_command, optimize_command, serve_command, status_command,
};

/// carbonroute - shipping routes ranked by cost, speed and carbon
#[derive(Parser)]
#[command(name = "carbonroute")]
#[command(about = "◆ Carbon-aware shipping route optimizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Reference data directory (overrides config and CARBONROUTE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config
    Init,
    /// Start the HTTP API server
    Serve {
        /// Verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Optimize one shipment and print the result as JSON
    Optimize {
        /// Origin city
        #[arg(short, long)]
        origin: String,
        /// Destination city
        #[arg(short, long)]
        destination: String,
        /// Cargo weight in tons
        #[arg(short, long)]
        weight: f64,
        /// Optimization priority
        #[arg(short, long, default_value = "balanced",
              value_parser = ["cost", "speed", "carbon", "balanced"])]
        priority: String,
    },
    /// List known locations
    Locations,
    /// Show system status
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so `optimize` output stays machine-readable
    let filter = if matches!(cli.command, Commands::Serve { verbose: true }) {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli.data_dir;
    let (name, outcome) = match cli.command {
        Commands::Init => ("Init", init_command().await),
        Commands::Serve { verbose: _ } => ("Serve", serve_command(data_dir).await),
        Commands::Optimize {
            origin,
            destination,
            weight,
            priority,
        } => (
            "Optimize",
            optimize_command(data_dir, origin, destination, weight, priority).await,
        ),
        Commands::Locations => ("Locations", locations_command(data_dir).await),
        Commands::Status => ("Status", status_command(data_dir).await),
    };

    if let Err(e) = outcome {
        error!("{} failed: {:#}", name, e);
        std::process::exit(1);
    }
}
