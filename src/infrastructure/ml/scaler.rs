//! Standardization scaler fitted offline (`mean` and `scale` per column).

use crate::domain::ports::{FeatureScaler, TargetScaler};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// `z = (x - mean) / scale`, column-wise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load fitted parameters from a JSON file (`{"mean": [...], "scale": [...]}`).
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open scaler file {:?}", path))?;
        let scaler: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse scaler file {:?}", path))?;
        scaler
            .validate()
            .with_context(|| format!("Invalid scaler in {:?}", path))?;

        info!("Loaded scaler from {:?} ({} columns)", path, scaler.columns());
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        if self.mean.is_empty() || self.mean.len() != self.scale.len() {
            anyhow::bail!(
                "mean and scale must be non-empty and of equal length (got {} and {})",
                self.mean.len(),
                self.scale.len()
            );
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            anyhow::bail!("mean must be finite");
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            anyhow::bail!("scale must be finite and non-zero");
        }
        Ok(())
    }

    pub fn columns(&self) -> usize {
        self.mean.len()
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, String> {
        if features.len() != self.columns() {
            return Err(format!(
                "expected {} columns, got {}",
                self.columns(),
                features.len()
            ));
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

impl TargetScaler for StandardScaler {
    fn inverse_transform(&self, scaled: f64) -> Result<f64, String> {
        if self.columns() != 1 {
            return Err(format!(
                "target scaler must have 1 column, has {}",
                self.columns()
            ));
        }
        Ok(scaled * self.scale[0] + self.mean[0])
    }
}
