//! Common test utilities for carbonroute integration tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// Reference data shipped with the repository
pub const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");

/// Isolated home directory with no credentials in the environment
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempdir()?;
        let config_dir = temp_dir.path().join(".carbonroute");

        Ok(Self {
            temp_dir,
            config_dir,
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Command with HOME pointed at the temp dir and the repo data dir
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_carbonroute"));
        cmd.env("HOME", self.temp_dir.path());
        cmd.env("CARBONROUTE_DATA_DIR", DATA_DIR);
        cmd.env_remove("CARBONROUTE_API_KEY");
        cmd.env_remove("CARBONROUTE_API_BASE");
        cmd.env_remove("CARBONROUTE_MODEL");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Write a config file with the given JSON
    pub fn write_config(&self, json: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::write(self.config_file(), json)?;
        Ok(())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new().expect("Failed to create test environment")
    }
}
