//! Command execution tests for carbonroute

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_init_writes_default_config() {
    let env = TestEnv::default();

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initializing"));

    let content = fs::read_to_string(env.config_file()).unwrap();
    let config: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(config["model"]["model"], "gemini-2.0-flash");
    assert_eq!(config["agents"]["policy"]["max_iterations"], 15);
    assert_eq!(config["server"]["port"], 8000);
}

#[test]
fn test_init_keeps_existing_config() {
    let env = TestEnv::default();
    env.write_config(r#"{"model": {"model": "custom-model"}}"#)
        .unwrap();

    env.command().arg("init").assert().success();

    let content = fs::read_to_string(env.config_file()).unwrap();
    assert!(content.contains("custom-model"));
}

#[test]
fn test_status_without_config() {
    let env = TestEnv::default();
    env.command()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config:"))
        .stdout(predicate::str::contains("[Missing]"))
        .stdout(predicate::str::contains("Stages:   route, carbon, policy, optimizer"));
}

#[test]
fn test_status_reads_config() {
    let env = TestEnv::default();
    env.write_config(
        r#"{"model": {"api_key": "k-123", "model": "gemini-test"},
            "pipeline": {"stages": ["route", "carbon"]}}"#,
    )
    .unwrap();

    env.command()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Model:    gemini-test"))
        .stdout(predicate::str::contains("API Key:  [Set]"))
        .stdout(predicate::str::contains("Stages:   route, carbon"));
}

#[test]
fn test_locations_lists_cities() {
    let env = TestEnv::default();
    env.command()
        .arg("locations")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shanghai (China, ASIA)"))
        .stdout(predicate::str::contains("Berlin"))
        .stdout(predicate::str::contains("known locations"));
}

#[test]
fn test_data_dir_flag_overrides_environment() {
    let env = TestEnv::default();
    let empty = tempfile::tempdir().unwrap();

    env.command()
        .args(["locations", "--data-dir"])
        .arg(empty.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("routes.json"));
}

#[test]
fn test_optimize_rejects_non_positive_weight() {
    let env = TestEnv::default();
    env.command()
        .args(["optimize", "-o", "Shanghai", "-d", "Berlin", "-w", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weight"));
}

#[test]
fn test_optimize_without_key_reports_route_failure() {
    let env = TestEnv::default();
    env.command()
        .args(["optimize", "-o", "Shanghai", "-d", "Berlin", "-w", "10", "-p", "carbon"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("Route Agent failed: no API key configured"));
}
