//! Configuration module for SpaceML.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Models and History.

mod history_config;
mod model_config;

pub use history_config::HistoryEnvConfig;
pub use model_config::ModelEnvConfig;

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub models: ModelEnvConfig,
    pub history: HistoryEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let models = ModelEnvConfig::from_vars(&var).context("Failed to load model config")?;
        let history =
            HistoryEnvConfig::from_vars(&var).context("Failed to load history config")?;

        Ok(Self { models, history })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_composes_sub_configs() {
        let config = Config::from_vars(|key| match key {
            "CANDIDATE_CLASS" => Some("0".to_string()),
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.models.label_mapping.candidate_class(), 0);
        assert_eq!(config.history.database_url, "sqlite::memory:");
        assert_eq!(config.history.cap, 10);
    }

    #[test]
    fn test_config_error_names_failing_section() {
        let err = Config::from_vars(|_| None).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load model config"));
    }
}
