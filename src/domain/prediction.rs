use crate::domain::errors::{PredictionError, PredictionResult};
use crate::domain::features::FeatureVector;
use crate::domain::planet::{CategoryScheme, EARTH_RADIUS_KM};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Probability reported when the classifier exposes no probability interface.
pub const NEUTRAL_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationLabel {
    Candidate,
    FalsePositive,
}

impl ClassificationLabel {
    pub fn is_candidate(&self) -> bool {
        matches!(self, ClassificationLabel::Candidate)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationLabel::Candidate => "candidate",
            ClassificationLabel::FalsePositive => "false_positive",
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationLabel::Candidate => write!(f, "PLANET CANDIDATE"),
            ClassificationLabel::FalsePositive => write!(f, "FALSE POSITIVE"),
        }
    }
}

impl FromStr for ClassificationLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(ClassificationLabel::Candidate),
            "false_positive" => Ok(ClassificationLabel::FalsePositive),
            _ => anyhow::bail!("Unknown classification label: {}", s),
        }
    }
}

/// Which raw class value of a binary classifier means "planet candidate".
///
/// Model artifacts disagree on this convention, so it is always supplied
/// explicitly alongside the artifact and never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMapping {
    candidate_class: u8,
}

impl LabelMapping {
    pub fn new(candidate_class: u8) -> anyhow::Result<Self> {
        if candidate_class > 1 {
            anyhow::bail!(
                "Invalid CANDIDATE_CLASS: {}. Must be 0 or 1",
                candidate_class
            );
        }
        Ok(Self { candidate_class })
    }

    pub fn candidate_class(&self) -> u8 {
        self.candidate_class
    }

    pub fn false_positive_class(&self) -> u8 {
        1 - self.candidate_class
    }

    /// Maps a raw class value; `None` for anything outside {0, 1}.
    pub fn label_for(&self, class: i64) -> Option<ClassificationLabel> {
        if class == i64::from(self.candidate_class) {
            Some(ClassificationLabel::Candidate)
        } else if class == i64::from(self.false_positive_class()) {
            Some(ClassificationLabel::FalsePositive)
        } else {
            None
        }
    }
}

impl FromStr for LabelMapping {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let class = s
            .trim()
            .parse::<u8>()
            .map_err(|_| anyhow::anyhow!("Invalid CANDIDATE_CLASS: {}. Must be 0 or 1", s))?;
        Self::new(class)
    }
}

/// Result of one classifier call, bound to the features it was computed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationOutcome {
    label: ClassificationLabel,
    confidence: f64,
    positive_probability: f64,
    probabilities_available: bool,
    features: FeatureVector,
}

impl ClassificationOutcome {
    pub(crate) fn new(
        label: ClassificationLabel,
        confidence: f64,
        positive_probability: f64,
        probabilities_available: bool,
        features: FeatureVector,
    ) -> Self {
        Self {
            label,
            confidence,
            positive_probability,
            probabilities_available,
            features,
        }
    }

    pub fn label(&self) -> ClassificationLabel {
        self.label
    }

    pub fn is_candidate(&self) -> bool {
        self.label.is_candidate()
    }

    /// Maximum class posterior, or 0.5 when probabilities are unavailable.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn positive_probability(&self) -> f64 {
        self.positive_probability
    }

    pub fn probabilities_available(&self) -> bool {
        self.probabilities_available
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }
}

/// Predicted planet size. Only the pipeline builds these, and only for candidates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionOutcome {
    radius: f64,
    planet_type: &'static str,
    scheme: CategoryScheme,
}

impl RegressionOutcome {
    pub(crate) fn new(radius: f64, scheme: CategoryScheme) -> Self {
        Self {
            radius,
            planet_type: scheme.categorize(radius),
            scheme,
        }
    }

    /// Radius in Earth radii.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn radius_km(&self) -> f64 {
        self.radius * EARTH_RADIUS_KM
    }

    pub fn planet_type(&self) -> &'static str {
        self.planet_type
    }

    pub fn scheme(&self) -> CategoryScheme {
        self.scheme
    }
}

/// One completed pipeline run as kept in the prediction history.
///
/// Fields are read-only; a false positive never carries a radius. The
/// timestamp is replaced with the append time when the record is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    id: Uuid,
    timestamp: DateTime<Utc>,
    label: ClassificationLabel,
    confidence: f64,
    positive_probability: f64,
    radius: Option<f64>,
    planet_type: Option<String>,
    category_scheme: Option<CategoryScheme>,
    features: FeatureVector,
}

impl PredictionRecord {
    /// Builds a record stamped with the current time (millisecond precision).
    pub fn new(
        classification: &ClassificationOutcome,
        regression: Option<&RegressionOutcome>,
    ) -> PredictionResult<Self> {
        if regression.is_some() && !classification.is_candidate() {
            return Err(PredictionError::InvalidState);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now().trunc_subsecs(3),
            label: classification.label(),
            confidence: classification.confidence(),
            positive_probability: classification.positive_probability(),
            radius: regression.map(|r| r.radius()),
            planet_type: regression.map(|r| r.planet_type().to_string()),
            category_scheme: regression.map(|r| r.scheme()),
            features: *classification.features(),
        })
    }

    /// Rebuilds a stored record.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: Uuid,
        timestamp: DateTime<Utc>,
        label: ClassificationLabel,
        confidence: f64,
        positive_probability: f64,
        radius: Option<f64>,
        planet_type: Option<String>,
        category_scheme: Option<CategoryScheme>,
        features: FeatureVector,
    ) -> PredictionResult<Self> {
        if radius.is_some() && !label.is_candidate() {
            return Err(PredictionError::InvalidState);
        }

        Ok(Self {
            id,
            timestamp,
            label,
            confidence,
            positive_probability,
            radius,
            planet_type,
            category_scheme,
            features,
        })
    }

    /// The same record stamped with `at` (millisecond precision).
    pub(crate) fn stamped(self, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.trunc_subsecs(3),
            ..self
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn label(&self) -> ClassificationLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn positive_probability(&self) -> f64 {
        self.positive_probability
    }

    /// Radius in Earth radii; `None` unless the record is a sized candidate.
    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn planet_type(&self) -> Option<&str> {
        self.planet_type.as_deref()
    }

    pub fn category_scheme(&self) -> Option<CategoryScheme> {
        self.category_scheme
    }

    pub fn features(&self) -> &FeatureVector {
        &self.features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::{RawFields, RawValue};

    fn features() -> FeatureVector {
        let fields: RawFields = [
            "period", "time0bk", "impact", "duration", "depth", "model_snr", "steff", "slogg",
            "srad",
        ]
        .into_iter()
        .map(|name| (name.to_string(), RawValue::Number(1.0)))
        .collect();
        FeatureVector::from_fields(&fields).unwrap()
    }

    #[test]
    fn test_label_mapping_conventions() {
        let zero = LabelMapping::new(0).unwrap();
        assert_eq!(zero.label_for(0), Some(ClassificationLabel::Candidate));
        assert_eq!(zero.label_for(1), Some(ClassificationLabel::FalsePositive));

        let one = LabelMapping::new(1).unwrap();
        assert_eq!(one.label_for(1), Some(ClassificationLabel::Candidate));
        assert_eq!(one.label_for(0), Some(ClassificationLabel::FalsePositive));

        assert_eq!(one.label_for(2), None);
        assert_eq!(one.label_for(-1), None);
    }

    #[test]
    fn test_label_mapping_rejects_other_classes() {
        assert!(LabelMapping::new(2).is_err());
        assert!("candidate".parse::<LabelMapping>().is_err());
        assert_eq!(" 1 ".parse::<LabelMapping>().unwrap().candidate_class(), 1);
    }

    #[test]
    fn test_label_string_roundtrip() {
        for label in [ClassificationLabel::Candidate, ClassificationLabel::FalsePositive] {
            assert_eq!(label.as_str().parse::<ClassificationLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_record_rejects_regression_for_false_positive() {
        let outcome = ClassificationOutcome::new(
            ClassificationLabel::FalsePositive,
            0.9,
            0.1,
            true,
            features(),
        );
        let sized = RegressionOutcome::new(1.1, CategoryScheme::Display);

        assert!(matches!(
            PredictionRecord::new(&outcome, Some(&sized)),
            Err(PredictionError::InvalidState)
        ));

        let record = PredictionRecord::new(&outcome, None).unwrap();
        assert_eq!(record.radius(), None);
        assert_eq!(record.planet_type(), None);
    }

    #[test]
    fn test_restore_rejects_sized_false_positive() {
        let restored = PredictionRecord::restore(
            Uuid::new_v4(),
            Utc::now(),
            ClassificationLabel::FalsePositive,
            0.9,
            0.1,
            Some(1.1),
            Some("Earth-like".to_string()),
            Some(CategoryScheme::Display),
            features(),
        );
        assert!(matches!(restored, Err(PredictionError::InvalidState)));
    }

    #[test]
    fn test_stamped_keeps_everything_but_the_time() {
        let outcome = ClassificationOutcome::new(
            ClassificationLabel::Candidate,
            0.8,
            0.8,
            true,
            features(),
        );
        let sized = RegressionOutcome::new(1.1, CategoryScheme::Display);
        let record = PredictionRecord::new(&outcome, Some(&sized)).unwrap();
        let later = record.timestamp() + chrono::Duration::seconds(5);

        let stamped = record.clone().stamped(later);
        assert_eq!(stamped.timestamp(), later.trunc_subsecs(3));
        assert_eq!(stamped.id(), record.id());
        assert_eq!(stamped.radius(), Some(1.1));
        assert_eq!(stamped.planet_type(), Some("Earth-like"));
    }

    #[test]
    fn test_regression_outcome_units() {
        let outcome = RegressionOutcome::new(2.0, CategoryScheme::Display);
        assert_eq!(outcome.planet_type(), "Mini-Neptune");
        assert!((outcome.radius_km() - 12742.0).abs() < 1e-9);
    }
}
