// crates/segtrain-config/src/docs.rs
// ============================================================================
// Module: Config Docs Generator
// Description: Markdown generator for segtrain.toml documentation.
// Purpose: Keep config docs in sync with schema and validation.
// Dependencies: serde_json, std
// ============================================================================

//! ## Overview
//! Generates `docs/configuration/segtrain.toml.md` from the canonical
//! configuration schema. The output is deterministic so drift between the
//! committed docs and the schema is detectable in CI.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;
use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::schema::config_schema;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default output path for generated configuration docs.
const DOCS_PATH: &str = "docs/configuration/segtrain.toml.md";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when generating or verifying config docs.
#[derive(Debug, Error)]
pub enum DocsError {
    /// IO failure while writing docs.
    #[error("docs io error: {0}")]
    Io(String),
    /// Schema traversal or rendering error.
    #[error("docs schema error: {0}")]
    Schema(String),
    /// Generated docs do not match the committed file.
    #[error("docs drift: {0}")]
    Drift(String),
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Generates the configuration markdown documentation.
///
/// # Errors
///
/// Returns [`DocsError`] when schema traversal fails.
pub fn config_docs_markdown() -> Result<String, DocsError> {
    let schema = config_schema();
    let mut out = String::new();

    out.push_str("<!--\n");
    out.push_str("docs/configuration/segtrain.toml.md\n");
    out.push_str("============================================================================\n");
    out.push_str("Document: Segtrain Pipeline Configuration\n");
    out.push_str("Description: Reference for segtrain.toml configuration fields.\n");
    out.push_str("Purpose: Document model, hyperparameter, dataset, and worker settings.\n");
    out.push_str("Generated: This file is auto-generated; do not edit manually.\n");
    out.push_str("============================================================================\n");
    out.push_str("-->\n\n");

    out.push_str("# segtrain.toml Configuration\n\n");
    out.push_str("## Overview\n\n");
    out.push_str("`segtrain.toml` configures the segmentation training pipeline: model\n");
    out.push_str("identity, training hyperparameters, dataset locations, and data-loader\n");
    out.push_str("worker resolution. All inputs are validated and fail closed on errors.\n");
    out.push_str("An empty file yields the built-in defaults.\n\n");

    out.push_str("## Top-Level Sections\n\n");

    for section in build_sections() {
        out.push_str("### ");
        out.push_str(section.heading);
        out.push_str("\n\n");
        if !section.description.is_empty() {
            out.push_str(section.description);
            out.push_str("\n\n");
        }
        let table = render_table(&schema, &section).map_err(DocsError::Schema)?;
        out.push_str(&table);
        if let Some(extra) = section.extra {
            out.push('\n');
            out.push_str(extra);
            out.push('\n');
        }
        out.push('\n');
    }

    Ok(out)
}

/// Writes the generated docs to the standard location.
///
/// # Errors
///
/// Returns [`DocsError`] when file output fails.
pub fn write_config_docs(path: Option<&Path>) -> Result<(), DocsError> {
    let path = path.unwrap_or_else(|| Path::new(DOCS_PATH));
    let content = config_docs_markdown()?;
    fs::write(path, content.as_bytes()).map_err(|err| DocsError::Io(err.to_string()))
}

/// Verifies the on-disk docs match the generated output.
///
/// # Errors
///
/// Returns [`DocsError`] when the docs drift.
pub fn verify_config_docs(path: Option<&Path>) -> Result<(), DocsError> {
    let path = path.unwrap_or_else(|| Path::new(DOCS_PATH));
    let content = config_docs_markdown()?;
    let existing = fs::read_to_string(path).map_err(|err| DocsError::Io(err.to_string()))?;
    if existing != content {
        return Err(DocsError::Drift(format!("docs mismatch: {}", path.display())));
    }
    Ok(())
}

// ============================================================================
// SECTION: Section Specs
// ============================================================================

/// Specification for one rendered documentation section.
#[derive(Clone, Copy)]
struct SectionSpec {
    /// Section heading, including TOML table name.
    heading: &'static str,
    /// Section description displayed beneath the heading.
    description: &'static str,
    /// Top-level schema property backing the section.
    property: &'static str,
    /// Ordered field list rendered in the docs table.
    fields: &'static [&'static str],
    /// Optional additional text appended after the table.
    extra: Option<&'static str>,
}

// ============================================================================
// SECTION: Section Registry
// ============================================================================

/// Builds the ordered list of configuration sections to render.
fn build_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec {
            heading: "[model]",
            description: "Model identity and reproducibility settings.",
            property: "model",
            fields: &["name", "seed"],
            extra: None,
        },
        SectionSpec {
            heading: "[hyperparameters]",
            description: "Training hyperparameters.",
            property: "hyperparameters",
            fields: &["batch_size", "num_epochs", "learning_rate", "num_classes"],
            extra: Some(
                "`num_classes` counts foreground and background, so the minimum is 2.",
            ),
        },
        SectionSpec {
            heading: "[dataset]",
            description: "Dataset locations and target raster dimensions.",
            property: "dataset",
            fields: &["train_dir", "dev_dir", "test_dir", "image_height", "image_width"],
            extra: Some(
                "The three split directories must be distinct. Existence and readability \
are checked by the data loader at pipeline start, not by config validation.",
            ),
        },
        SectionSpec {
            heading: "[workers]",
            description: "Data-loader worker resolution policy.",
            property: "workers",
            fields: &["count", "fallback"],
            extra: Some(
                "With `count` unset, the worker count is detected once from the host's \
available parallelism. When detection fails, `fallback` is used; with no fallback \
configured, startup aborts with a worker detection error.",
            ),
        },
    ]
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the markdown table for one configuration section.
fn render_table(schema: &Value, section: &SectionSpec) -> Result<String, String> {
    let section_schema = section_schema(schema, section.property)?;
    let props = section_schema
        .get("properties")
        .and_then(|value| value.as_object())
        .ok_or_else(|| "schema properties missing".to_string())?;

    for field in section.fields {
        if !props.contains_key(*field) {
            return Err(format!("missing field in schema: {field}"));
        }
    }
    for key in props.keys() {
        if !section.fields.contains(&key.as_str()) {
            return Err(format!("field not documented: {key}"));
        }
    }

    let mut table = String::new();
    table.push_str("| Field | Type | Default | Notes |\n");
    table.push_str("| --- | --- | --- | --- |\n");

    for field in section.fields {
        let raw_schema =
            props.get(*field).ok_or_else(|| format!("missing field schema: {field}"))?;
        let prop_schema = unwrap_nullable(raw_schema);
        let field_type = escape_table_cell(&format_schema_type(raw_schema));
        let default_value = raw_schema
            .get("default")
            .map(format_default_value)
            .or_else(|| prop_schema.get("default").map(format_default_value))
            .unwrap_or_else(|| "n/a".to_string());
        let notes = raw_schema
            .get("description")
            .and_then(|value| value.as_str())
            .or_else(|| prop_schema.get("description").and_then(|value| value.as_str()))
            .unwrap_or("");
        let _ = writeln!(&mut table, "| `{field}` | {field_type} | {default_value} | {notes} |");
    }

    Ok(table)
}

/// Resolves a top-level section schema by property name.
fn section_schema<'a>(schema: &'a Value, name: &str) -> Result<&'a Value, String> {
    schema
        .get("properties")
        .and_then(|value| value.as_object())
        .and_then(|props| props.get(name))
        .ok_or_else(|| format!("property not found: {name}"))
}

/// Returns the non-null branch of a nullable `oneOf` schema.
fn unwrap_nullable(schema: &Value) -> &Value {
    if let Some(one_of) = schema.get("oneOf").and_then(|val| val.as_array())
        && one_of.len() == 2
        && let Some(other) =
            one_of.iter().find(|item| item.get("type").and_then(|val| val.as_str()) != Some("null"))
    {
        return other;
    }
    schema
}

/// Formats a schema type for markdown tables.
fn format_schema_type(schema: &Value) -> String {
    if let Some(one_of) = schema.get("oneOf").and_then(|val| val.as_array()) {
        let mut types = one_of
            .iter()
            .filter(|item| item.get("type").and_then(|val| val.as_str()) != Some("null"))
            .map(format_schema_type)
            .collect::<Vec<String>>();
        if types.len() == 1 {
            let mut only = types.remove(0);
            only.push_str(" | null");
            return only;
        }
    }
    if let Some(type_str) = schema.get("type").and_then(|val| val.as_str()) {
        return match type_str {
            "boolean" => "bool".to_string(),
            "object" => "table".to_string(),
            other => other.to_string(),
        };
    }
    "unknown".to_string()
}

/// Escapes pipe characters for markdown table cells.
fn escape_table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Formats schema defaults for display in docs.
fn format_default_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(val) => val.to_string(),
        Value::Number(val) => val.to_string(),
        Value::String(val) => val.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
