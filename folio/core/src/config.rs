//! Configuration
//!
//! Layered configuration for the reel, loaded with the following priority
//! (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Compiled-in defaults
//!
//! The file lives at `$XDG_CONFIG_HOME/folio/folio.toml` (typically
//! `~/.config/folio/folio.toml`). A missing file is not an error.
//!
//! # Example Configuration
//!
//! ```toml
//! [reel]
//! tick_ms = 50
//! poll_ms = 50
//! clear_between_runs = false
//! max_lines = 500
//!
//! [fetch]
//! base_url = "http://localhost:8000"
//! timeout_secs = 10
//!
//! [catalog]
//! files = ["/files/samples/main", "/files/samples/network"]
//! ```
//!
//! # Environment Variables
//!
//! - `FOLIO_BASE_URL`: base URL for relative catalog entries
//! - `FOLIO_TICK_MS`: delay between typed units
//! - `FOLIO_POLL_MS`: scheduler poll cadence
//! - `FOLIO_CLEAR`: clear the surface before each new file (`1`/`true`)
//! - `FOLIO_MAX_LINES`: lines kept between files (`0` keeps everything)
//! - `FOLIO_FETCH_TIMEOUT`: request timeout in seconds
//! - `FOLIO_CATALOG`: comma-separated catalog override

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::fetch::DEFAULT_FETCH_TIMEOUT_SECS;
use crate::typewriter::DEFAULT_TICK_INTERVAL_MS;

/// Scheduler poll cadence unless configured otherwise
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Lines kept on the surface between files (0 keeps everything)
pub const DEFAULT_MAX_LINES: usize = 500;

/// Base URL relative catalog entries resolve against by default
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration last got a value from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[reel]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelToml {
    /// Delay between typed units in milliseconds
    pub tick_ms: Option<u64>,
    /// Scheduler poll cadence in milliseconds
    pub poll_ms: Option<u64>,
    /// Clear the surface before each new file
    pub clear_between_runs: Option<bool>,
    /// Lines kept on the surface between files
    pub max_lines: Option<usize>,
}

/// `[fetch]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchToml {
    /// Base URL for relative catalog entries
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[catalog]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogToml {
    /// Replacement list of sample files
    pub files: Option<Vec<String>>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioToml {
    pub reel: ReelToml,
    pub fetch: FetchToml,
    pub catalog: CatalogToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for the reel
#[derive(Clone, Debug)]
pub struct FolioConfig {
    /// Delay between typed units
    pub tick_interval: Duration,
    /// Scheduler poll cadence
    pub poll_interval: Duration,
    /// Clear the surface before each new file
    pub clear_between_runs: bool,
    /// Whole lines kept on the surface when a new file starts (0 = no limit)
    pub max_lines: usize,
    /// Base URL for relative catalog entries
    pub base_url: String,
    /// Request timeout
    pub fetch_timeout: Duration,
    /// Files to pick from
    pub catalog: Catalog,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Source of configuration values
    source: ConfigSource,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            clear_between_runs: false,
            max_lines: DEFAULT_MAX_LINES,
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            catalog: Catalog::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl FolioConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check that intervals are usable
    ///
    /// A zero tick or poll interval would spin the driver loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "base URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("folio").join("folio.toml"))
}

/// Load and validate configuration from the default path, environment and
/// defaults
pub fn load_config() -> Result<FolioConfig, ConfigError> {
    let config = load_config_from_path(default_config_path())?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific path
///
/// The result is not validated yet: CLI overrides still go on top, and
/// [`ConfigOverrides::apply`] validates the final values.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<FolioConfig, ConfigError> {
    let mut config = FolioConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_config = read_toml(config_path)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

fn read_toml(path: &Path) -> Result<FolioToml, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut FolioConfig, toml: &FolioToml) -> Result<(), ConfigError> {
    if let Some(ms) = toml.reel.tick_ms {
        config.tick_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.reel.poll_ms {
        config.poll_interval = Duration::from_millis(ms);
    }
    if let Some(clear) = toml.reel.clear_between_runs {
        config.clear_between_runs = clear;
    }
    if let Some(lines) = toml.reel.max_lines {
        config.max_lines = lines;
    }

    if let Some(ref url) = toml.fetch.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = toml.fetch.timeout_secs {
        config.fetch_timeout = Duration::from_secs(secs);
    }

    if let Some(ref files) = toml.catalog.files {
        config.catalog = Catalog::new(files.iter().cloned())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    }

    Ok(())
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Apply environment variable overrides to the config
///
/// `lookup` is `std::env::var` in production; tests pass a map.
fn apply_env_config(
    config: &mut FolioConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(url) = lookup("FOLIO_BASE_URL") {
        config.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = lookup("FOLIO_TICK_MS").and_then(|v| v.parse::<u64>().ok()) {
        config.tick_interval = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = lookup("FOLIO_POLL_MS").and_then(|v| v.parse::<u64>().ok()) {
        config.poll_interval = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(clear) = lookup("FOLIO_CLEAR") {
        config.clear_between_runs = parse_flag(&clear);
        config.source = ConfigSource::Env;
    }
    if let Some(lines) = lookup("FOLIO_MAX_LINES").and_then(|v| v.parse::<usize>().ok()) {
        config.max_lines = lines;
        config.source = ConfigSource::Env;
    }
    if let Some(secs) = lookup("FOLIO_FETCH_TIMEOUT").and_then(|v| v.parse::<u64>().ok()) {
        config.fetch_timeout = Duration::from_secs(secs);
        config.source = ConfigSource::Env;
    }
    if let Some(files) = lookup("FOLIO_CATALOG") {
        config.catalog = Catalog::new(files.split(','))
            .map_err(|e| ConfigError::ValidationError(format!("FOLIO_CATALOG: {}", e)))?;
        config.source = ConfigSource::Env;
    }

    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub tick_ms: Option<u64>,
    pub poll_ms: Option<u64>,
    pub clear_between_runs: Option<bool>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_tick_ms(mut self, ms: u64) -> Self {
        self.tick_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn with_poll_ms(mut self, ms: u64) -> Self {
        self.poll_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn with_clear_between_runs(mut self, clear: bool) -> Self {
        self.clear_between_runs = Some(clear);
        self
    }

    /// Apply overrides, then re-validate
    pub fn apply(&self, config: &mut FolioConfig) -> Result<(), ConfigError> {
        let mut touched = false;
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
            touched = true;
        }
        if let Some(ms) = self.tick_ms {
            config.tick_interval = Duration::from_millis(ms);
            touched = true;
        }
        if let Some(ms) = self.poll_ms {
            config.poll_interval = Duration::from_millis(ms);
            touched = true;
        }
        if let Some(clear) = self.clear_between_runs {
            config.clear_between_runs = clear;
            touched = true;
        }
        if touched {
            config.source = ConfigSource::Cli;
        }
        config.validate()
    }
}
