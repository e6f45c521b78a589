//! Harness configuration (mathutil.toml)
//!
//! Precedence, later overrides earlier:
//! 1. Built-in defaults
//! 2. `[harness]` table of `mathutil.toml`
//! 3. Environment variables (`MATHUTIL_*`)
//! 4. CLI flags (applied by the binary)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name
pub const CONFIG_FILE: &str = "mathutil.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level layout of mathutil.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    harness: HarnessConfig,
}

/// Runner settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct HarnessConfig {
    /// Run suites in parallel (default: true)
    pub parallel: bool,

    /// One line per case instead of one glyph
    pub verbose: bool,

    /// Override the detected runtime version (e.g., "1.70")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,

    /// Default name filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            verbose: false,
            runtime_version: None,
            filter: None,
        }
    }
}

impl HarnessConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Load from a TOML file, falling back to defaults when it is missing
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Parse TOML content; `file` is only used in error messages
    pub fn parse(content: &str, file: &Path) -> ConfigResult<Self> {
        let parsed: ConfigFile =
            toml::from_str(content).map_err(|error| ConfigError::TomlParseError {
                file: file.to_path_buf(),
                error,
            })?;
        Ok(parsed.harness)
    }

    /// Apply `MATHUTIL_*` overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup("MATHUTIL_SEQUENTIAL") {
            self.parallel = !is_truthy(&value);
        }
        if let Some(value) = lookup("MATHUTIL_VERBOSE") {
            self.verbose = is_truthy(&value);
        }
        if let Some(value) = lookup("MATHUTIL_RUNTIME_VERSION") {
            self.runtime_version = Some(value);
        }
        self
    }
}

fn is_truthy(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    !(lower.is_empty() || lower == "0" || lower == "false" || lower == "off")
}
