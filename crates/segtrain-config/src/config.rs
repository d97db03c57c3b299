// crates/segtrain-config/src/config.rs
// ============================================================================
// Module: Segtrain Configuration
// Description: Configuration loading and validation for segtrain.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: any error during load or
//! resolution aborts pipeline start before a consumer runs.
//!
//! All values are set once and read-only afterwards. [`TrainingConfig`] is
//! the parsed file; [`ResolvedConfig`] is the frozen value handed to the
//! training system after the one-time worker-count resolution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::thread;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "segtrain.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SEGTRAIN_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the model name.
pub(crate) const MAX_MODEL_NAME_LENGTH: usize = 256;
/// Maximum samples per optimization step.
pub(crate) const MAX_BATCH_SIZE: usize = 65_536;
/// Maximum number of full dataset passes.
pub(crate) const MAX_EPOCHS: usize = 1_000_000;
/// Maximum optimizer step size.
pub(crate) const MAX_LEARNING_RATE: f64 = 1_000.0;
/// Maximum number of output categories.
pub(crate) const MAX_CLASSES: usize = 65_536;
/// Minimum number of output categories (foreground + background).
pub(crate) const MIN_CLASSES: usize = 2;
/// Maximum target raster dimension in pixels.
pub(crate) const MAX_IMAGE_DIMENSION: u32 = 65_536;
/// Maximum data-loader worker count.
pub(crate) const MAX_WORKERS: usize = 4_096;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Segtrain pipeline configuration as parsed from `segtrain.toml`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TrainingConfig {
    /// Model identity and reproducibility settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// Training hyperparameters.
    #[serde(default)]
    pub hyperparameters: HyperparameterConfig,
    /// Dataset locations and target raster dimensions.
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Data-loader worker resolution policy.
    #[serde(default)]
    pub workers: WorkerConfig,
}

impl TrainingConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is taken from the explicit argument, then the
    /// `SEGTRAIN_CONFIG` environment variable, then `segtrain.toml` in the
    /// working directory. A missing file is an error; callers that want the
    /// built-in defaults use [`TrainingConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// Validation is lexical only: directory existence and readability are
    /// the responsibility of the component that first consumes a path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.model.validate()?;
        self.hyperparameters.validate()?;
        self.dataset.validate()?;
        self.workers.validate()?;
        Ok(())
    }

    /// Validates and freezes the configuration, performing the one-time
    /// worker-count query against the host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or the host cannot
    /// report its available parallelism and no fallback is configured.
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        self.validate()?;
        let num_workers = self.workers.resolve()?;
        Ok(ResolvedConfig {
            model: self.model,
            hyperparameters: self.hyperparameters,
            dataset: self.dataset,
            num_workers,
        })
    }
}

/// Model identity and reproducibility settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Human-readable model label.
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Random seed for reproducible runs.
    #[serde(default = "default_random_seed")]
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            seed: default_random_seed(),
        }
    }
}

impl ModelConfig {
    /// Validates model identity settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("model.name must be non-empty".to_string()));
        }
        if self.name.len() > MAX_MODEL_NAME_LENGTH {
            return Err(ConfigError::Invalid("model.name exceeds max length".to_string()));
        }
        Ok(())
    }
}

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HyperparameterConfig {
    /// Samples per optimization step.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Number of full dataset passes.
    #[serde(default = "default_num_epochs")]
    pub num_epochs: usize,
    /// Optimizer step size.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Number of output categories, foreground + background.
    #[serde(default = "default_num_classes")]
    pub num_classes: usize,
}

impl Default for HyperparameterConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            num_epochs: default_num_epochs(),
            learning_rate: default_learning_rate(),
            num_classes: default_num_classes(),
        }
    }
}

impl HyperparameterConfig {
    /// Validates hyperparameter ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "hyperparameters.batch_size must be at least 1".to_string(),
            ));
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::Invalid(
                "hyperparameters.batch_size exceeds limit".to_string(),
            ));
        }
        if self.num_epochs == 0 {
            return Err(ConfigError::Invalid(
                "hyperparameters.num_epochs must be at least 1".to_string(),
            ));
        }
        if self.num_epochs > MAX_EPOCHS {
            return Err(ConfigError::Invalid(
                "hyperparameters.num_epochs exceeds limit".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() {
            return Err(ConfigError::Invalid(
                "hyperparameters.learning_rate must be finite".to_string(),
            ));
        }
        if self.learning_rate <= 0.0 {
            return Err(ConfigError::Invalid(
                "hyperparameters.learning_rate must be positive".to_string(),
            ));
        }
        if self.learning_rate > MAX_LEARNING_RATE {
            return Err(ConfigError::Invalid(
                "hyperparameters.learning_rate exceeds limit".to_string(),
            ));
        }
        if self.num_classes < MIN_CLASSES {
            return Err(ConfigError::Invalid(
                "hyperparameters.num_classes must be at least 2".to_string(),
            ));
        }
        if self.num_classes > MAX_CLASSES {
            return Err(ConfigError::Invalid(
                "hyperparameters.num_classes exceeds limit".to_string(),
            ));
        }
        Ok(())
    }
}

/// Dataset locations and target raster dimensions.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Training split directory.
    #[serde(default = "default_train_dir")]
    pub train_dir: PathBuf,
    /// Development split directory.
    #[serde(default = "default_dev_dir")]
    pub dev_dir: PathBuf,
    /// Test split directory.
    #[serde(default = "default_test_dir")]
    pub test_dir: PathBuf,
    /// Target raster height in pixels.
    #[serde(default = "default_image_height")]
    pub image_height: u32,
    /// Target raster width in pixels.
    #[serde(default = "default_image_width")]
    pub image_width: u32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            train_dir: default_train_dir(),
            dev_dir: default_dev_dir(),
            test_dir: default_test_dir(),
            image_height: default_image_height(),
            image_width: default_image_width(),
        }
    }
}

impl DatasetConfig {
    /// Validates dataset paths and raster dimensions.
    ///
    /// Directory existence is deliberately not checked here; the data loader
    /// owns filesystem errors and reports them with the offending path.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_dir_field("dataset.train_dir", &self.train_dir)?;
        validate_dir_field("dataset.dev_dir", &self.dev_dir)?;
        validate_dir_field("dataset.test_dir", &self.test_dir)?;
        let train = normalized_path(&self.train_dir);
        let dev = normalized_path(&self.dev_dir);
        let test = normalized_path(&self.test_dir);
        if train == dev {
            return Err(ConfigError::Invalid(
                "dataset.train_dir and dataset.dev_dir must be distinct".to_string(),
            ));
        }
        if train == test {
            return Err(ConfigError::Invalid(
                "dataset.train_dir and dataset.test_dir must be distinct".to_string(),
            ));
        }
        if dev == test {
            return Err(ConfigError::Invalid(
                "dataset.dev_dir and dataset.test_dir must be distinct".to_string(),
            ));
        }
        if self.image_height == 0 {
            return Err(ConfigError::Invalid(
                "dataset.image_height must be at least 1".to_string(),
            ));
        }
        if self.image_height > MAX_IMAGE_DIMENSION {
            return Err(ConfigError::Invalid("dataset.image_height exceeds limit".to_string()));
        }
        if self.image_width == 0 {
            return Err(ConfigError::Invalid(
                "dataset.image_width must be at least 1".to_string(),
            ));
        }
        if self.image_width > MAX_IMAGE_DIMENSION {
            return Err(ConfigError::Invalid("dataset.image_width exceeds limit".to_string()));
        }
        Ok(())
    }
}

/// Data-loader worker resolution policy.
///
/// When `count` is unset, the worker count is resolved exactly once from the
/// host's available parallelism during [`TrainingConfig::resolve`]. The
/// failure policy is explicit: a configured `fallback` is used when the host
/// cannot report its CPU count, otherwise resolution fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct WorkerConfig {
    /// Fixed worker count; unset selects host auto-detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Worker count used when auto-detection fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<usize>,
}

impl WorkerConfig {
    /// Validates worker policy settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(count) = self.count {
            if count == 0 {
                return Err(ConfigError::Invalid(
                    "workers.count must be at least 1".to_string(),
                ));
            }
            if count > MAX_WORKERS {
                return Err(ConfigError::Invalid("workers.count exceeds limit".to_string()));
            }
            if self.fallback.is_some() {
                return Err(ConfigError::Invalid(
                    "workers.fallback only applies when workers.count is unset".to_string(),
                ));
            }
        }
        if let Some(fallback) = self.fallback {
            if fallback == 0 {
                return Err(ConfigError::Invalid(
                    "workers.fallback must be at least 1".to_string(),
                ));
            }
            if fallback > MAX_WORKERS {
                return Err(ConfigError::Invalid("workers.fallback exceeds limit".to_string()));
            }
        }
        Ok(())
    }

    /// Resolves the effective worker count against the host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkerDetection`] when the host cannot report
    /// its available parallelism and no fallback is configured.
    pub fn resolve(&self) -> Result<usize, ConfigError> {
        let detected = thread::available_parallelism().ok().map(std::num::NonZeroUsize::get);
        self.apply_detection(detected)
    }

    /// Applies the resolution policy to a detection outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkerDetection`] when detection failed and no
    /// fallback is configured.
    pub fn apply_detection(&self, detected: Option<usize>) -> Result<usize, ConfigError> {
        if let Some(count) = self.count {
            return Ok(count);
        }
        if let Some(count) = detected {
            return Ok(count);
        }
        self.fallback.ok_or_else(|| {
            ConfigError::WorkerDetection(
                "host cpu count unavailable and no workers.fallback configured".to_string(),
            )
        })
    }
}

/// Frozen configuration handed to the training system.
///
/// Produced once by [`TrainingConfig::resolve`]; every consumer receives this
/// value explicitly instead of querying the environment. `num_workers` is
/// always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    /// Model identity and reproducibility settings.
    pub model: ModelConfig,
    /// Training hyperparameters.
    pub hyperparameters: HyperparameterConfig,
    /// Dataset locations and target raster dimensions.
    pub dataset: DatasetConfig,
    /// Effective data-loader worker count.
    pub num_workers: usize,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised during configuration loading, validation, or resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Host CPU count unavailable without a configured fallback.
    #[error("worker detection failed: {0}")]
    WorkerDetection(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a dataset directory path against length constraints.
fn validate_dir_field(field: &str, value: &Path) -> Result<(), ConfigError> {
    let text = value.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in value.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Normalizes a path lexically for distinctness comparison.
///
/// `./` prefixes and trailing slashes must not hide duplicate splits.
fn normalized_path(path: &Path) -> PathBuf {
    path.components().filter(|component| !matches!(component, Component::CurDir)).collect()
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default model label.
pub(crate) fn default_model_name() -> String {
    "Universal Resnet50 23_06_04".to_string()
}

/// Returns the default random seed.
pub(crate) const fn default_random_seed() -> u64 {
    100
}

/// Returns the default batch size.
pub(crate) const fn default_batch_size() -> usize {
    2
}

/// Returns the default epoch count.
pub(crate) const fn default_num_epochs() -> usize {
    100
}

/// Returns the default learning rate.
pub(crate) const fn default_learning_rate() -> f64 {
    0.001
}

/// Returns the default class count (foreground + background).
pub(crate) const fn default_num_classes() -> usize {
    2
}

/// Returns the default training split directory.
pub(crate) fn default_train_dir() -> PathBuf {
    PathBuf::from("data/train")
}

/// Returns the default development split directory.
pub(crate) fn default_dev_dir() -> PathBuf {
    PathBuf::from("data/dev")
}

/// Returns the default test split directory.
pub(crate) fn default_test_dir() -> PathBuf {
    PathBuf::from("data/test")
}

/// Returns the default target raster height.
pub(crate) const fn default_image_height() -> u32 {
    1024
}

/// Returns the default target raster width.
pub(crate) const fn default_image_width() -> u32 {
    1024
}
