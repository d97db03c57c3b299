// crates/segtrain-cli/src/main.rs
// ============================================================================
// Module: Segtrain CLI Entry Point
// Description: Command dispatcher for segtrain configuration workflows.
// Purpose: Validate, print, and scaffold segtrain.toml plus its artifacts.
// Dependencies: clap, segtrain-config, serde_json, thiserror, toml.
// ============================================================================

//! ## Overview
//! The segtrain CLI exposes the configuration workflows of the training
//! pipeline: validating `segtrain.toml`, printing the effective (optionally
//! resolved) configuration, scaffolding a canonical example file, and
//! generating or verifying the config schema and docs artifacts.
//!
//! The training loop itself is a separate consumer; it receives the frozen
//! configuration and is out of scope for this binary.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use segtrain_config::ResolvedConfig;
use segtrain_config::TrainingConfig;
use segtrain_config::config_schema;
use segtrain_config::config_toml_example;
use segtrain_config::verify_config_docs;
use segtrain_config::write_config_docs;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default output path for `config init`.
const DEFAULT_INIT_PATH: &str = "segtrain.toml";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "segtrain", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration workflows for segtrain.toml.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration file.
    Validate(ValidateCommand),
    /// Print the effective configuration.
    Print(PrintCommand),
    /// Write a canonical example configuration file.
    Init(InitCommand),
    /// Print the JSON schema for segtrain.toml.
    Schema,
    /// Generate or verify the configuration docs.
    Docs(DocsCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Path to the configuration file (defaults to `SEGTRAIN_CONFIG`, then
    /// `segtrain.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `config print`.
#[derive(Args, Debug)]
struct PrintCommand {
    /// Path to the configuration file (defaults to `SEGTRAIN_CONFIG`, then
    /// `segtrain.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format for the printed configuration.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "toml")]
    format: OutputFormat,
    /// Resolve the worker count before printing.
    #[arg(long, action = ArgAction::SetTrue)]
    resolved: bool,
}

/// Arguments for `config init`.
#[derive(Args, Debug)]
struct InitCommand {
    /// Output path for the example configuration.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Overwrite an existing file.
    #[arg(long, action = ArgAction::SetTrue)]
    force: bool,
}

/// Arguments for `config docs`.
#[derive(Args, Debug)]
struct DocsCommand {
    /// Output path for the generated docs (defaults to the standard
    /// location).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Verify the on-disk docs instead of writing them.
    #[arg(long, action = ArgAction::SetTrue)]
    verify: bool,
}

/// Output formats for `config print`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum OutputFormat {
    /// TOML output matching the config file format.
    #[default]
    Toml,
    /// JSON output for tooling.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("segtrain {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        let mut command = Cli::command();
        command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
        write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(args) => run_validate(&args)?,
            ConfigCommand::Print(args) => run_print(&args)?,
            ConfigCommand::Init(args) => run_init(&args)?,
            ConfigCommand::Schema => run_schema()?,
            ConfigCommand::Docs(args) => run_docs(&args)?,
        },
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Command Handlers
// ============================================================================

/// Handles `config validate`.
fn run_validate(command: &ValidateCommand) -> CliResult<()> {
    // Loading already validates; success here means the file is usable.
    load_config(command.config.as_deref())?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Handles `config print`.
fn run_print(command: &PrintCommand) -> CliResult<()> {
    let config = load_config(command.config.as_deref())?;
    let rendered = if command.resolved {
        let resolved = config.resolve().map_err(|err| CliError::new(err.to_string()))?;
        render_resolved_config(&resolved, command.format)?
    } else {
        render_training_config(&config, command.format)?
    };
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Handles `config init`.
fn run_init(command: &InitCommand) -> CliResult<()> {
    let path =
        command.output.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_INIT_PATH));
    write_example_config(&path, command.force)?;
    write_stdout_line(&format!("config written: {}", path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Handles `config schema`.
fn run_schema() -> CliResult<()> {
    let schema = serde_json::to_string_pretty(&config_schema())
        .map_err(|err| CliError::new(format!("schema render error: {err}")))?;
    write_stdout_line(&schema).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Handles `config docs`.
fn run_docs(command: &DocsCommand) -> CliResult<()> {
    if command.verify {
        verify_config_docs(command.output.as_deref())
            .map_err(|err| CliError::new(err.to_string()))?;
        write_stdout_line("docs ok").map_err(|err| CliError::new(output_error("stdout", &err)))
    } else {
        write_config_docs(command.output.as_deref())
            .map_err(|err| CliError::new(err.to_string()))?;
        write_stdout_line("docs written")
            .map_err(|err| CliError::new(output_error("stdout", &err)))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads the training configuration from the requested path.
fn load_config(path: Option<&Path>) -> CliResult<TrainingConfig> {
    TrainingConfig::load(path).map_err(|err| CliError::new(err.to_string()))
}

/// Renders a parsed configuration in the requested format.
fn render_training_config(config: &TrainingConfig, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Toml => toml::to_string_pretty(config)
            .map_err(|err| CliError::new(format!("toml render error: {err}"))),
        OutputFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|err| CliError::new(format!("json render error: {err}"))),
    }
}

/// Renders a resolved configuration in the requested format.
fn render_resolved_config(resolved: &ResolvedConfig, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Toml => toml::to_string_pretty(resolved)
            .map_err(|err| CliError::new(format!("toml render error: {err}"))),
        OutputFormat::Json => serde_json::to_string_pretty(resolved)
            .map_err(|err| CliError::new(format!("json render error: {err}"))),
    }
}

/// Writes the canonical example config, refusing to clobber without force.
fn write_example_config(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::new(format!(
            "refusing to overwrite {}; pass --force to replace it",
            path.display()
        )));
    }
    fs::write(path, config_toml_example())
        .map_err(|err| CliError::new(format!("write error for {}: {err}", path.display())))
}

/// Formats an output stream failure message.
fn output_error(stream: &str, err: &std::io::Error) -> String {
    format!("failed to write to {stream}: {err}")
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("error: {message}"));
    ExitCode::FAILURE
}
