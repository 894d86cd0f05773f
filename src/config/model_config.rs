//! Model artifact configuration parsing from environment variables.
//!
//! This module handles artifact locations, the class-label convention of the
//! classifier artifact, and the planet category scheme.

use crate::domain::planet::CategoryScheme;
use crate::domain::prediction::LabelMapping;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub classifier_path: PathBuf,
    pub regressor_path: PathBuf,
    pub x_scaler_path: PathBuf,
    pub y_scaler_path: PathBuf,
    pub label_mapping: LabelMapping,
    pub category_scheme: CategoryScheme,
}

impl ModelEnvConfig {
    /// Builds the config from a variable lookup (the process environment in production).
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = |key: &str, default: &str| {
            PathBuf::from(var(key).unwrap_or_else(|| default.to_string()))
        };

        // The label convention differs between artifacts and has no safe default.
        let candidate_class = var("CANDIDATE_CLASS")
            .context("CANDIDATE_CLASS is required: the raw class value (0 or 1) meaning 'planet candidate'")?;
        let label_mapping = LabelMapping::from_str(&candidate_class)?;

        let category_scheme = match var("PLANET_CATEGORY_SCHEME") {
            Some(value) => CategoryScheme::from_str(&value)?,
            None => CategoryScheme::default(),
        };

        Ok(Self {
            classifier_path: path("CLASSIFIER_MODEL_PATH", "models/classification_model.json"),
            regressor_path: path("REGRESSOR_MODEL_PATH", "models/regression_model.json"),
            x_scaler_path: path("X_SCALER_PATH", "models/x_scaler.json"),
            y_scaler_path: path("Y_SCALER_PATH", "models/y_scaler.json"),
            label_mapping,
            category_scheme,
        })
    }
}
