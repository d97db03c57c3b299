// crates/segtrain-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic examples for docs and tooling.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for segtrain configuration. The output is
//! deterministic and kept in sync with schema and docs by tests.

/// Returns a canonical example `segtrain.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[model]
name = "Universal Resnet50 23_06_04"
seed = 100

[hyperparameters]
batch_size = 2
num_epochs = 100
learning_rate = 0.001
num_classes = 2

[dataset]
train_dir = "data/train"
dev_dir = "data/dev"
test_dir = "data/test"
image_height = 1024
image_width = 1024

[workers]
# count = 8
fallback = 1
"#,
    )
}
