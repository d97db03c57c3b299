// crates/segtrain-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for config rendering and init scaffolding.
// Purpose: Ensure CLI helpers render faithfully and refuse unsafe overwrites.
// Dependencies: segtrain-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the rendering helpers behind `config print` and the overwrite
//! policy behind `config init`.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use segtrain_config::TrainingConfig;
use segtrain_config::config_toml_example;

use super::OutputFormat;
use super::load_config;
use super::render_resolved_config;
use super::render_training_config;
use super::write_example_config;

// ============================================================================
// SECTION: Rendering
// ============================================================================

#[test]
fn toml_rendering_round_trips_through_the_model() {
    let config = TrainingConfig::default();
    let rendered = render_training_config(&config, OutputFormat::Toml).unwrap();
    let parsed: TrainingConfig = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn json_rendering_includes_all_sections() {
    let config = TrainingConfig::default();
    let rendered = render_training_config(&config, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    for section in ["model", "hyperparameters", "dataset", "workers"] {
        assert!(value.get(section).is_some(), "missing section: {section}");
    }
}

#[test]
fn resolved_rendering_reports_the_fixed_worker_count() {
    let mut config = TrainingConfig::default();
    config.workers.count = Some(8);
    let resolved = config.resolve().unwrap();
    let rendered = render_resolved_config(&resolved, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value.get("num_workers").and_then(serde_json::Value::as_u64), Some(8));
}

// ============================================================================
// SECTION: Init Scaffolding
// ============================================================================

#[test]
fn init_writes_the_canonical_example() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segtrain.toml");
    write_example_config(&path, false).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, config_toml_example());
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segtrain.toml");
    fs::write(&path, "existing").unwrap();
    let result = write_example_config(&path, false);
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
}

#[test]
fn init_overwrites_with_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segtrain.toml");
    fs::write(&path, "existing").unwrap();
    write_example_config(&path, true).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), config_toml_example());
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn load_config_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = load_config(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("config io error"), "unexpected error: {err}");
}

#[test]
fn load_config_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segtrain.toml");
    fs::write(&path, "[hyperparameters]\nnum_classes = 1\n").unwrap();
    let err = load_config(Some(&path)).unwrap_err();
    assert!(
        err.to_string().contains("hyperparameters.num_classes"),
        "unexpected error: {err}"
    );
}

#[test]
fn load_config_accepts_the_example_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segtrain.toml");
    fs::write(&path, config_toml_example()).unwrap();
    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.hyperparameters.batch_size, 2);
    assert_eq!(config.workers.fallback, Some(1));
}
