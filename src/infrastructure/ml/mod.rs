//! Fitted model artifacts and their adapters to the domain ports.

pub mod scaler;
pub mod smartcore_models;

pub use scaler::StandardScaler;
pub use smartcore_models::{SmartCoreClassifier, SmartCoreRegressor};

use crate::application::inference_pipeline::InferencePipeline;
use crate::config::ModelEnvConfig;
use crate::domain::features::REGRESSION_FEATURES;
use crate::domain::ports::{Classifier, FeatureScaler, Regressor, TargetScaler};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// The four fitted collaborators, loaded once at startup.
pub struct ModelBundle {
    pub classifier: Arc<dyn Classifier>,
    pub regressor: Arc<dyn Regressor>,
    pub x_scaler: Arc<dyn FeatureScaler>,
    pub y_scaler: Arc<dyn TargetScaler>,
}

impl ModelBundle {
    pub fn load(config: &ModelEnvConfig) -> Result<Self> {
        let classifier = SmartCoreClassifier::load(&config.classifier_path)
            .context("Failed to load classification model")?;
        let regressor = SmartCoreRegressor::load(&config.regressor_path)
            .context("Failed to load regression model")?;
        let x_scaler =
            StandardScaler::load(&config.x_scaler_path).context("Failed to load x-scaler")?;
        let y_scaler =
            StandardScaler::load(&config.y_scaler_path).context("Failed to load y-scaler")?;

        if x_scaler.columns() != REGRESSION_FEATURES.len() {
            anyhow::bail!(
                "x-scaler must have {} columns, has {}",
                REGRESSION_FEATURES.len(),
                x_scaler.columns()
            );
        }
        if y_scaler.columns() != 1 {
            anyhow::bail!(
                "y-scaler must have exactly 1 column, has {}",
                y_scaler.columns()
            );
        }

        info!(
            "Model bundle ready: {} / {}",
            classifier.name(),
            regressor.name()
        );

        Ok(Self {
            classifier: Arc::new(classifier),
            regressor: Arc::new(regressor),
            x_scaler: Arc::new(x_scaler),
            y_scaler: Arc::new(y_scaler),
        })
    }

    pub fn into_pipeline(self, config: &ModelEnvConfig) -> InferencePipeline {
        InferencePipeline::new(
            self.classifier,
            self.regressor,
            self.x_scaler,
            self.y_scaler,
            config.label_mapping,
            config.category_scheme,
        )
    }
}
