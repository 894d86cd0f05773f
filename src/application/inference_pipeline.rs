//! Two-stage inference: classification gating, then conditional sizing.
//!
//! The classifier sees the raw classification columns. Only candidates reach
//! the regressor, whose input goes through the x-scaler and whose output goes
//! through the y-scaler's inverse. Classification features are never scaled.

use crate::domain::errors::{PredictionError, PredictionResult};
use crate::domain::features::{FeatureVector, RawFields};
use crate::domain::planet::CategoryScheme;
use crate::domain::ports::{Classifier, FeatureScaler, Regressor, TargetScaler};
use crate::domain::prediction::{
    ClassificationOutcome, LabelMapping, NEUTRAL_PROBABILITY, RegressionOutcome,
};
use std::sync::Arc;
use tracing::{debug, warn};

const X_SCALER: &str = "x-scaler";
const Y_SCALER: &str = "y-scaler";

/// Immutable set of fitted collaborators, shared by reference across callers.
pub struct InferencePipeline {
    classifier: Arc<dyn Classifier>,
    regressor: Arc<dyn Regressor>,
    x_scaler: Arc<dyn FeatureScaler>,
    y_scaler: Arc<dyn TargetScaler>,
    label_mapping: LabelMapping,
    category_scheme: CategoryScheme,
}

impl InferencePipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        regressor: Arc<dyn Regressor>,
        x_scaler: Arc<dyn FeatureScaler>,
        y_scaler: Arc<dyn TargetScaler>,
        label_mapping: LabelMapping,
        category_scheme: CategoryScheme,
    ) -> Self {
        Self {
            classifier,
            regressor,
            x_scaler,
            y_scaler,
            label_mapping,
            category_scheme,
        }
    }

    pub fn label_mapping(&self) -> LabelMapping {
        self.label_mapping
    }

    pub fn category_scheme(&self) -> CategoryScheme {
        self.category_scheme
    }

    /// Validates raw input and classifies it.
    pub fn classify(&self, fields: &RawFields) -> PredictionResult<ClassificationOutcome> {
        let features = FeatureVector::from_fields(fields)?;
        self.classify_vector(&features)
    }

    /// Classifies an already validated vector.
    pub fn classify_vector(
        &self,
        features: &FeatureVector,
    ) -> PredictionResult<ClassificationOutcome> {
        let input = features.to_classification_array();

        let class = self
            .classifier
            .predict(&input)
            .map_err(|e| PredictionError::model(self.classifier.name(), e))?;
        let label = self.label_mapping.label_for(class).ok_or_else(|| {
            PredictionError::model(
                self.classifier.name(),
                format!("unexpected class value {}", class),
            )
        })?;

        let (confidence, positive_probability, probabilities_available) =
            match self.classifier.predict_probability(&input) {
                Some(result) => {
                    let distribution =
                        result.map_err(|e| PredictionError::model(self.classifier.name(), e))?;
                    self.check_distribution(&distribution)?;
                    let positive =
                        distribution[usize::from(self.label_mapping.candidate_class())];
                    (distribution[0].max(distribution[1]), positive, true)
                }
                None => {
                    warn!(
                        "{} exposes no probabilities, reporting neutral confidence",
                        self.classifier.name()
                    );
                    (NEUTRAL_PROBABILITY, NEUTRAL_PROBABILITY, false)
                }
            };

        debug!(
            "Classified as {} (class={}, confidence={:.3}, p_candidate={:.3})",
            label, class, confidence, positive_probability
        );

        Ok(ClassificationOutcome::new(
            label,
            confidence,
            positive_probability,
            probabilities_available,
            *features,
        ))
    }

    fn check_distribution(&self, distribution: &[f64; 2]) -> PredictionResult<()> {
        if distribution
            .iter()
            .any(|p| !p.is_finite() || !(0.0..=1.0).contains(p))
        {
            return Err(PredictionError::model(
                self.classifier.name(),
                format!("probabilities outside [0, 1]: {:?}", distribution),
            ));
        }
        Ok(())
    }

    /// Sizes a confirmed candidate.
    ///
    /// `additional` supplies `teq`/`insol` when the classification call did
    /// not carry them. Fails with `InvalidState` unless `outcome` is positive.
    pub fn regress(
        &self,
        outcome: &ClassificationOutcome,
        additional: &RawFields,
    ) -> PredictionResult<RegressionOutcome> {
        if !outcome.is_candidate() {
            return Err(PredictionError::InvalidState);
        }

        let features = outcome.features().with_regression_fields(additional)?;
        let input = features.to_regression_array()?;

        let scaled = self
            .x_scaler
            .transform(&input)
            .map_err(|e| PredictionError::model(X_SCALER, e))?;
        if scaled.len() != input.len() {
            return Err(PredictionError::model(
                X_SCALER,
                format!("expected {} columns, got {}", input.len(), scaled.len()),
            ));
        }

        let scaled_radius = self
            .regressor
            .predict(&scaled)
            .map_err(|e| PredictionError::model(self.regressor.name(), e))?;
        let radius = self
            .y_scaler
            .inverse_transform(scaled_radius)
            .map_err(|e| PredictionError::model(Y_SCALER, e))?;

        if !radius.is_finite() {
            return Err(PredictionError::model(
                self.regressor.name(),
                format!("non-finite radius {}", radius),
            ));
        }

        let sized = RegressionOutcome::new(radius, self.category_scheme);
        debug!(
            "Sized candidate: scaled={:.4}, radius={:.3} R_earth ({})",
            scaled_radius,
            radius,
            sized.planet_type()
        );
        Ok(sized)
    }

    /// Classifies a full observation and sizes it when it is a candidate.
    pub fn classify_and_size(
        &self,
        fields: &RawFields,
    ) -> PredictionResult<(ClassificationOutcome, Option<RegressionOutcome>)> {
        let outcome = self.classify(fields)?;
        if !outcome.is_candidate() {
            return Ok((outcome, None));
        }
        let sized = self.regress(&outcome, &RawFields::new())?;
        Ok((outcome, Some(sized)))
    }
}
