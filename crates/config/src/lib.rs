//! Configuration management for carbonroute
//!
//! Loads the JSON config file, applies environment overrides and exposes
//! the per-agent model settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod paths;

pub use paths::{config_path, expand_home, home_dir};

/// Environment variable holding the model service credential
pub const ENV_API_KEY: &str = "CARBONROUTE_API_KEY";
/// Environment variable overriding the model endpoint
pub const ENV_API_BASE: &str = "CARBONROUTE_API_BASE";
/// Environment variable overriding the model name
pub const ENV_MODEL: &str = "CARBONROUTE_MODEL";
/// Environment variable overriding the reference data directory
pub const ENV_DATA_DIR: &str = "CARBONROUTE_DATA_DIR";

/// Errors in configuration handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Hosted model service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

/// Conversation limits for one agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentLimits {
    pub max_iterations: u32,
    pub temperature: f32,
}

impl AgentLimits {
    pub const fn new(max_iterations: u32, temperature: f32) -> Self {
        Self {
            max_iterations,
            temperature,
        }
    }
}

/// Per-agent conversation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default = "default_route_limits")]
    pub route: AgentLimits,
    #[serde(default = "default_carbon_limits")]
    pub carbon: AgentLimits,
    #[serde(default = "default_policy_limits")]
    pub policy: AgentLimits,
    #[serde(default = "default_optimizer_limits")]
    pub optimizer: AgentLimits,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            route: default_route_limits(),
            carbon: default_carbon_limits(),
            policy: default_policy_limits(),
            optimizer: default_optimizer_limits(),
        }
    }
}

fn default_route_limits() -> AgentLimits {
    AgentLimits::new(10, 0.1)
}

fn default_carbon_limits() -> AgentLimits {
    AgentLimits::new(10, 0.1)
}

// Marketplace queries take extra round-trips
fn default_policy_limits() -> AgentLimits {
    AgentLimits::new(15, 0.1)
}

fn default_optimizer_limits() -> AgentLimits {
    AgentLimits::new(10, 0.2)
}

/// Which pipeline stages run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_stages")]
    pub stages: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: default_stages(),
        }
    }
}

fn default_stages() -> Vec<String> {
    ["route", "carbon", "policy", "optimizer"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// HTTP server binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Reference data location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    /// Load from the default location and apply environment overrides
    pub async fn load() -> Result<Self> {
        let path = config_path();
        let mut config = Self::load_from(&path).await?;
        config.apply_env();
        Ok(config)
    }

    /// Load from a specific location; a missing file yields defaults
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no config at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("reading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to a specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        debug!("writing config to {:?}", path);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Overlay `CARBONROUTE_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay values from an arbitrary variable source
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.model.api_key = key;
        }
        if let Some(base) = non_empty(ENV_API_BASE) {
            self.model.api_base = base;
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.model.model = model;
        }
        if let Some(dir) = non_empty(ENV_DATA_DIR) {
            self.data.dir = dir;
        }
    }

    /// Model service credential, if any
    pub fn api_key(&self) -> Option<String> {
        let key = self.model.api_key.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    /// Log a warning when no credential is configured
    pub fn warn_if_unkeyed(&self) {
        if !self.has_api_key() {
            warn!(
                "no model API key configured (set {} or model.api_key); agents will fail on first call",
                ENV_API_KEY
            );
        }
    }

    /// Reference data directory with `~` expanded
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.data.dir)
    }

    /// Socket address string for the HTTP server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Write a default config unless one exists
pub async fn init() -> Result<Config> {
    let config_path = config_path();

    if config_path.exists() {
        warn!("config already exists at {:?}", config_path);
    } else {
        let config = Config::default();
        config.save().await?;
        info!("default config written to {:?}", config_path);
    }

    Config::load().await
}
