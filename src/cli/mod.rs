// src/cli/mod.rs
//! Command-line interface definitions

/// Clap argument structures
pub mod commands;

pub use commands::{
    Action, Commands, ConfigOptions, HashOptions, MiningOverrides, StartOptions, VerifyOptions,
};

use crate::config::{Config, OutputFormat};
use crate::utils::error::MinerError;

impl MiningOverrides {
    /// Loads the config file (or defaults) and applies the command-line overrides
    ///
    /// # Errors
    /// Returns `MinerError::ConfigError` if the file is unreadable or the
    /// resulting settings are invalid.
    pub fn resolve(&self) -> Result<Config, MinerError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(difficulty) = self.difficulty {
            config.difficulty.leading_zero_hex_digits = difficulty;
        }
        if let Some(yield_every) = self.yield_every {
            config.difficulty.yield_every_rounds = yield_every;
        }
        if self.json {
            config.session.output = OutputFormat::Json;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let overrides = MiningOverrides {
            difficulty: Some(2),
            json: true,
            ..Default::default()
        };
        let config = overrides.resolve().unwrap();
        assert_eq!(config.difficulty.leading_zero_hex_digits, 2);
        assert_eq!(config.difficulty.yield_every_rounds, 100_000);
        assert_eq!(config.session.output, OutputFormat::Json);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = MiningOverrides {
            yield_every: Some(0),
            ..Default::default()
        };
        assert!(matches!(overrides.resolve(), Err(MinerError::ConfigError(_))));
    }
}
