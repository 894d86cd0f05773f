//! Prediction history configuration parsing from environment variables.

use crate::application::history_store::DEFAULT_HISTORY_CAP;
use anyhow::{Context, Result};

/// History environment configuration
#[derive(Debug, Clone)]
pub struct HistoryEnvConfig {
    pub database_url: String,
    pub cap: usize,
}

impl Default for HistoryEnvConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://data/spaceml.db".to_string(),
            cap: DEFAULT_HISTORY_CAP,
        }
    }
}

impl HistoryEnvConfig {
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let cap = match var("HISTORY_CAP") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .context("Failed to parse HISTORY_CAP")?,
            None => defaults.cap,
        };
        if cap == 0 {
            anyhow::bail!("HISTORY_CAP must be at least 1");
        }

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
            cap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_config_defaults() {
        let config = HistoryEnvConfig::from_vars(|_| None).unwrap();
        assert_eq!(config.cap, 10);
        assert_eq!(config.database_url, "sqlite://data/spaceml.db");
    }

    #[test]
    fn test_history_cap_validation() {
        let cap = |value: &'static str| {
            move |key: &str| (key == "HISTORY_CAP").then(|| value.to_string())
        };
        assert_eq!(HistoryEnvConfig::from_vars(cap("25")).unwrap().cap, 25);
        assert!(HistoryEnvConfig::from_vars(cap("0")).is_err());
        assert!(HistoryEnvConfig::from_vars(cap("ten")).is_err());
    }
}
