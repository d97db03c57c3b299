// crates/segtrain-config/src/lib.rs
// ============================================================================
// Module: Segtrain Config Library
// Description: Canonical config model, validation, and artifact generation.
// Purpose: Single source of truth for segtrain.toml semantics.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! `segtrain-config` defines the canonical configuration model for the
//! segtrain segmentation training pipeline: model identity, training
//! hyperparameters, dataset locations, and worker resolution. It provides
//! strict, fail-closed validation and deterministic generators for the
//! config schema, example, and docs.
//!
//! The training system itself (data loader, trainer, evaluator) is an
//! external consumer: it receives a frozen [`ResolvedConfig`] and never
//! queries the environment on its own.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod docs;
pub mod examples;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use docs::config_docs_markdown;
pub use docs::verify_config_docs;
pub use docs::write_config_docs;
pub use examples::config_toml_example;
pub use schema::config_schema;
