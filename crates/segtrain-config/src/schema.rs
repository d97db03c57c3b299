// crates/segtrain-config/src/schema.rs
// ============================================================================
// Module: Config Schemas
// Description: JSON schema builders for segtrain.toml.
// Purpose: Provide canonical validation schema for config artifacts.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! This module defines the JSON Schema for segtrain configuration. The
//! schema is generated from the canonical config model, shares its limit
//! constants with the validator, and is used by tooling, docs, and
//! validation pipelines.

use serde_json::Value;
use serde_json::json;

use crate::config::MAX_BATCH_SIZE;
use crate::config::MAX_CLASSES;
use crate::config::MAX_EPOCHS;
use crate::config::MAX_IMAGE_DIMENSION;
use crate::config::MAX_LEARNING_RATE;
use crate::config::MAX_MODEL_NAME_LENGTH;
use crate::config::MAX_TOTAL_PATH_LENGTH;
use crate::config::MAX_WORKERS;
use crate::config::MIN_CLASSES;
use crate::config::default_batch_size;
use crate::config::default_image_height;
use crate::config::default_image_width;
use crate::config::default_learning_rate;
use crate::config::default_model_name;
use crate::config::default_num_classes;
use crate::config::default_num_epochs;
use crate::config::default_random_seed;

/// Returns the JSON schema for `segtrain.toml`.
#[must_use]
pub fn config_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "segtrain://contract/schemas/config.schema.json",
        "title": "Segtrain Pipeline Configuration",
        "description": "Configuration for the segtrain segmentation training pipeline.",
        "type": "object",
        "properties": {
            "model": model_config_schema(),
            "hyperparameters": hyperparameter_config_schema(),
            "dataset": dataset_config_schema(),
            "workers": worker_config_schema()
        },
        "additionalProperties": false
    })
}

// ============================================================================
// SECTION: Model Configuration
// ============================================================================

/// Schema for the model configuration section.
fn model_config_schema() -> Value {
    json!({
        "type": "object",
        "description": "Model identity and reproducibility settings.",
        "properties": {
            "name": {
                "type": "string",
                "description": "Human-readable model label.",
                "minLength": 1,
                "maxLength": MAX_MODEL_NAME_LENGTH,
                "default": default_model_name()
            },
            "seed": {
                "type": "integer",
                "description": "Random seed for reproducible runs.",
                "minimum": 0,
                "default": default_random_seed()
            }
        },
        "additionalProperties": false
    })
}

// ============================================================================
// SECTION: Hyperparameter Configuration
// ============================================================================

/// Schema for the hyperparameter configuration section.
fn hyperparameter_config_schema() -> Value {
    json!({
        "type": "object",
        "description": "Training hyperparameters.",
        "properties": {
            "batch_size": {
                "type": "integer",
                "description": "Samples per optimization step.",
                "minimum": 1,
                "maximum": MAX_BATCH_SIZE,
                "default": default_batch_size()
            },
            "num_epochs": {
                "type": "integer",
                "description": "Number of full dataset passes.",
                "minimum": 1,
                "maximum": MAX_EPOCHS,
                "default": default_num_epochs()
            },
            "learning_rate": {
                "type": "number",
                "description": "Optimizer step size.",
                "exclusiveMinimum": 0.0,
                "maximum": MAX_LEARNING_RATE,
                "default": default_learning_rate()
            },
            "num_classes": {
                "type": "integer",
                "description": "Number of output categories, foreground + background.",
                "minimum": MIN_CLASSES,
                "maximum": MAX_CLASSES,
                "default": default_num_classes()
            }
        },
        "additionalProperties": false
    })
}

// ============================================================================
// SECTION: Dataset Configuration
// ============================================================================

/// Schema for the dataset configuration section.
fn dataset_config_schema() -> Value {
    json!({
        "type": "object",
        "description": "Dataset locations and target raster dimensions.",
        "properties": {
            "train_dir": {
                "type": "string",
                "description": "Training split directory.",
                "minLength": 1,
                "maxLength": MAX_TOTAL_PATH_LENGTH,
                "default": "data/train"
            },
            "dev_dir": {
                "type": "string",
                "description": "Development split directory.",
                "minLength": 1,
                "maxLength": MAX_TOTAL_PATH_LENGTH,
                "default": "data/dev"
            },
            "test_dir": {
                "type": "string",
                "description": "Test split directory.",
                "minLength": 1,
                "maxLength": MAX_TOTAL_PATH_LENGTH,
                "default": "data/test"
            },
            "image_height": {
                "type": "integer",
                "description": "Target raster height in pixels.",
                "minimum": 1,
                "maximum": MAX_IMAGE_DIMENSION,
                "default": default_image_height()
            },
            "image_width": {
                "type": "integer",
                "description": "Target raster width in pixels.",
                "minimum": 1,
                "maximum": MAX_IMAGE_DIMENSION,
                "default": default_image_width()
            }
        },
        "additionalProperties": false
    })
}

// ============================================================================
// SECTION: Worker Configuration
// ============================================================================

/// Schema for the worker configuration section.
fn worker_config_schema() -> Value {
    json!({
        "type": "object",
        "description": "Data-loader worker resolution policy.",
        "properties": {
            "count": {
                "oneOf": [
                    { "type": "null" },
                    { "type": "integer", "minimum": 1, "maximum": MAX_WORKERS }
                ],
                "description": "Fixed worker count; unset selects host auto-detection.",
                "default": null
            },
            "fallback": {
                "oneOf": [
                    { "type": "null" },
                    { "type": "integer", "minimum": 1, "maximum": MAX_WORKERS }
                ],
                "description": "Worker count used when auto-detection fails.",
                "default": null
            }
        },
        "additionalProperties": false
    })
}
