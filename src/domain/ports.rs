//! Ports for the externally supplied, already-fitted models.
//!
//! Implementations are opaque to the pipeline: it only relies on the input
//! and output shapes documented on each method. Failures are reported as
//! plain strings and wrapped by the pipeline with the collaborator's name.

/// Binary classifier over the classification columns.
pub trait Classifier: Send + Sync {
    /// Predict the raw class value (0 or 1).
    fn predict(&self, features: &[f64]) -> Result<i64, String>;

    /// Class posterior probabilities, indexed by raw class value.
    ///
    /// `None` when the model exposes no probability interface.
    fn predict_probability(&self, _features: &[f64]) -> Option<Result<[f64; 2], String>> {
        None
    }

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Regressor over the scaled regression columns, producing a scaled scalar.
pub trait Regressor: Send + Sync {
    fn predict(&self, scaled_features: &[f64]) -> Result<f64, String>;

    fn name(&self) -> &str;
}

/// Forward transform applied to the regression columns before the regressor.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, String>;
}

/// Inverse transform applied to the regressor output.
pub trait TargetScaler: Send + Sync {
    fn inverse_transform(&self, scaled: f64) -> Result<f64, String>;
}
