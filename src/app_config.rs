use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Overlap resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Cue output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// What to do with input intervals whose start is not before their end
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidIntervalPolicy {
    // @policy: Fail the whole batch on the first invalid interval
    #[default]
    Reject,
    // @policy: Filter invalid intervals out and report how many
    Drop,
}

impl std::fmt::Display for InvalidIntervalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Drop => write!(f, "drop"),
        }
    }
}

impl std::str::FromStr for InvalidIntervalPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "drop" => Ok(Self::Drop),
            _ => Err(anyhow!("Invalid interval policy: {}", s)),
        }
    }
}

/// Overlap resolution configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolverConfig {
    // @field: Handling of intervals with start >= end
    #[serde(default)]
    pub invalid_policy: InvalidIntervalPolicy,

    // @field: Upper bound on pairwise splits per batch
    #[serde(default = "default_max_splits")]
    pub max_splits: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            invalid_policy: InvalidIntervalPolicy::default(),
            max_splits: default_max_splits(),
        }
    }
}

/// Cue output configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    // @field: Index of the first emitted cue
    #[serde(default)]
    pub first_index: usize,

    // @field: Extension of generated subtitle files
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            first_index: 0,
            extension: default_extension(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_splits() -> usize {
    100_000
}

fn default_extension() -> String {
    "srt".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.resolver.max_splits == 0 {
            return Err(anyhow!("resolver.max_splits must be greater than zero"));
        }

        let extension = self.output.extension.trim();
        if extension.is_empty() {
            return Err(anyhow!("output.extension must not be empty"));
        }
        if extension.contains(['/', '\\']) {
            return Err(anyhow!("output.extension must not contain path separators: {}", extension));
        }

        Ok(())
    }

    /// Load a configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            resolver: ResolverConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
