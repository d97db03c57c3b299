//! Hyperparameter validation tests for segtrain-config.
// crates/segtrain-config/tests/hyperparameter_validation.rs
// =============================================================================
// Module: Hyperparameter Validation Tests
// Description: Range enforcement for batch size, epochs, learning rate, classes.
// Purpose: Ensure invalid hyperparameters fail closed with named fields.
// =============================================================================

use segtrain_config::ConfigError;

mod common;

type TestResult = Result<(), String>;

// Limit constants (from config.rs)
const MAX_BATCH_SIZE: usize = 65_536;
const MAX_EPOCHS: usize = 1_000_000;
const MAX_LEARNING_RATE: f64 = 1_000.0;
const MAX_CLASSES: usize = 65_536;

/// Assert that a validation result is an error containing a specific substring.
fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn zero_batch_size_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.batch_size = 0;
    assert_invalid(config.validate(), "hyperparameters.batch_size must be at least 1")
}

#[test]
fn batch_size_at_limit_accepted() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.batch_size = MAX_BATCH_SIZE;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn batch_size_over_limit_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.batch_size = MAX_BATCH_SIZE + 1;
    assert_invalid(config.validate(), "hyperparameters.batch_size exceeds limit")
}

#[test]
fn zero_epochs_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.num_epochs = 0;
    assert_invalid(config.validate(), "hyperparameters.num_epochs must be at least 1")
}

#[test]
fn epochs_over_limit_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.num_epochs = MAX_EPOCHS + 1;
    assert_invalid(config.validate(), "hyperparameters.num_epochs exceeds limit")
}

#[test]
fn zero_learning_rate_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.learning_rate = 0.0;
    assert_invalid(config.validate(), "hyperparameters.learning_rate must be positive")
}

#[test]
fn negative_learning_rate_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.learning_rate = -0.001;
    assert_invalid(config.validate(), "hyperparameters.learning_rate must be positive")
}

#[test]
fn nan_learning_rate_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.learning_rate = f64::NAN;
    assert_invalid(config.validate(), "hyperparameters.learning_rate must be finite")
}

#[test]
fn infinite_learning_rate_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.learning_rate = f64::INFINITY;
    assert_invalid(config.validate(), "hyperparameters.learning_rate must be finite")
}

#[test]
fn learning_rate_over_limit_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.learning_rate = MAX_LEARNING_RATE * 2.0;
    assert_invalid(config.validate(), "hyperparameters.learning_rate exceeds limit")
}

#[test]
fn single_class_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.num_classes = 1;
    assert_invalid(config.validate(), "hyperparameters.num_classes must be at least 2")
}

#[test]
fn zero_classes_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.num_classes = 0;
    assert_invalid(config.validate(), "hyperparameters.num_classes must be at least 2")
}

#[test]
fn classes_over_limit_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.hyperparameters.num_classes = MAX_CLASSES + 1;
    assert_invalid(config.validate(), "hyperparameters.num_classes exceeds limit")
}

#[test]
fn binary_segmentation_config_accepted() -> TestResult {
    let config = common::config_from_toml(
        r#"
[hyperparameters]
batch_size = 2
num_classes = 2
"#,
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())
}
