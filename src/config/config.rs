// src/config/config.rs
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of hex characters in a SHA-256 digest
const MAX_LEADING_ZEROS: u32 = 64;

/// Main configuration structure for the line miner
///
/// Groups the search tunables and the session behaviour. Every field has a
/// default, so an empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Proof-of-work tunables
    #[serde(default)]
    pub difficulty: DifficultyConfig,

    /// Input and output behaviour of the interactive session
    #[serde(default)]
    pub session: SessionConfig,
}

/// Search difficulty and yield cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Required count of leading `'0'` hex digits in a digest
    /// (default: 5)
    #[serde(default = "default_leading_zero_hex_digits")]
    pub leading_zero_hex_digits: u32,

    /// Rounds between cooperative yields
    /// (default: 100000)
    #[serde(default = "default_yield_every_rounds")]
    pub yield_every_rounds: u64,
}

/// How the session consumes lines and renders events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whether a new line waits for the previous job
    #[serde(default)]
    pub input: InputPolicy,

    /// Event rendering
    #[serde(default)]
    pub output: OutputFormat,
}

/// Policy for accepting lines while jobs are running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputPolicy {
    /// Every line starts a job immediately
    #[default]
    Concurrent,
    /// The next line is read only after the current job finished
    Sequential,
}

/// Rendering of events on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable text lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

fn default_leading_zero_hex_digits() -> u32 {
    5
}

fn default_yield_every_rounds() -> u64 {
    100_000
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        DifficultyConfig {
            leading_zero_hex_digits: default_leading_zero_hex_digits(),
            yield_every_rounds: default_yield_every_rounds(),
        }
    }
}

impl DifficultyConfig {
    /// Creates a validated difficulty configuration
    ///
    /// # Errors
    /// See [`DifficultyConfig::validate`].
    pub fn new(leading_zero_hex_digits: u32, yield_every_rounds: u64) -> Result<Self, MinerError> {
        let config = DifficultyConfig {
            leading_zero_hex_digits,
            yield_every_rounds,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the tunables describe a searchable target
    ///
    /// # Errors
    /// Returns `MinerError::ConfigError` if the difficulty exceeds the digest
    /// length or the yield cadence is zero.
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.leading_zero_hex_digits > MAX_LEADING_ZEROS {
            return Err(MinerError::ConfigError(format!(
                "leading_zero_hex_digits must be at most {}, got {}",
                MAX_LEADING_ZEROS, self.leading_zero_hex_digits
            )));
        }
        if self.yield_every_rounds == 0 {
            return Err(MinerError::ConfigError(
                "yield_every_rounds must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(MinerError)` - If file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&config_str)
    }

    /// Parses and validates a TOML configuration string
    pub fn parse(config_str: &str) -> Result<Self, MinerError> {
        let config: Config = toml::from_str(config_str)
            .map_err(|e| MinerError::ConfigError(format!("Invalid config format: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section
    pub fn validate(&self) -> Result<(), MinerError> {
        self.difficulty.validate()
    }

    /// Generates a configuration template string
    ///
    /// # Returns
    /// String containing a commented TOML configuration with the defaults
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# Line Miner Configuration\n\n");
        template.push_str("[difficulty]\n");
        template.push_str("# Leading zero hex digits a digest needs (0-64)\n");
        template.push_str("leading_zero_hex_digits = 5\n");
        template.push_str("# Rounds between cooperative yields (must be positive)\n");
        template.push_str("yield_every_rounds = 100000\n\n");

        template.push_str("[session]\n");
        template.push_str("# \"concurrent\" starts every line at once, \"sequential\" waits for each job\n");
        template.push_str("input = \"concurrent\"\n");
        template.push_str("# \"text\" or \"json\"\n");
        template.push_str("output = \"text\"\n");

        template
    }
}
