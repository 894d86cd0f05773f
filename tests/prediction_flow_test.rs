use spaceml::application::history_store::HistoryStore;
use spaceml::application::inference_pipeline::InferencePipeline;
use spaceml::application::prediction_service::PredictionService;
use spaceml::domain::errors::PredictionError;
use spaceml::domain::features::{RawFields, RawValue};
use spaceml::domain::planet::CategoryScheme;
use spaceml::domain::ports::{Classifier, Regressor};
use spaceml::domain::prediction::{ClassificationLabel, LabelMapping};
use spaceml::infrastructure::InMemoryPredictionHistoryRepository;
use spaceml::infrastructure::ml::StandardScaler;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Signal-to-noise gate with logistic probabilities; class 0 means candidate.
struct SnrClassifier;

impl SnrClassifier {
    fn candidate_probability(features: &[f64]) -> f64 {
        let snr = features[5];
        1.0 / (1.0 + (-(snr - 10.0) / 5.0).exp())
    }
}

impl Classifier for SnrClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, String> {
        Ok(if Self::candidate_probability(features) >= 0.5 { 0 } else { 1 })
    }

    fn predict_probability(&self, features: &[f64]) -> Option<Result<[f64; 2], String>> {
        let p = Self::candidate_probability(features);
        Some(Ok([p, 1.0 - p]))
    }

    fn name(&self) -> &str {
        "snr-classifier"
    }
}

/// Averages the scaled columns and counts its calls.
struct AveragingRegressor {
    calls: AtomicUsize,
}

impl Regressor for AveragingRegressor {
    fn predict(&self, scaled_features: &[f64]) -> Result<f64, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(scaled_features.iter().sum::<f64>() / scaled_features.len() as f64)
    }

    fn name(&self) -> &str {
        "averaging-regressor"
    }
}

fn observation(model_snr: f64) -> RawFields {
    [
        ("koi_period", 9.49),
        ("koi_time0bk", 170.5),
        ("koi_impact", 0.146),
        ("koi_duration", 2.96),
        ("koi_depth", 616.0),
        ("koi_model_snr", model_snr),
        ("koi_steff", 5455.0),
        ("koi_slogg", 4.5),
        ("koi_srad", 0.93),
        ("koi_teq", 793.0),
        ("koi_insol", 93.6),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), RawValue::Number(v)))
    .collect()
}

struct Harness {
    service: PredictionService,
    regressor: Arc<AveragingRegressor>,
}

fn harness() -> Harness {
    let regressor = Arc::new(AveragingRegressor {
        calls: AtomicUsize::new(0),
    });
    // Centred on the reference observation, so its scaled input is all zeros.
    let x_scaler = StandardScaler::new(
        vec![9.49, 0.146, 2.96, 616.0, 35.8, 5455.0, 4.5, 0.93, 793.0, 93.6],
        vec![1.0; 10],
    )
    .unwrap();
    let y_scaler = StandardScaler::new(vec![2.26], vec![1.1]).unwrap();

    let pipeline = InferencePipeline::new(
        Arc::new(SnrClassifier),
        regressor.clone(),
        Arc::new(x_scaler),
        Arc::new(y_scaler),
        LabelMapping::new(0).unwrap(),
        CategoryScheme::Display,
    );
    let history = HistoryStore::new(Arc::new(InMemoryPredictionHistoryRepository::new()), 10);

    Harness {
        service: PredictionService::new(Arc::new(pipeline), Arc::new(history)),
        regressor,
    }
}

#[tokio::test]
async fn test_candidate_is_classified_sized_and_recorded() {
    let h = harness();
    let fields = observation(35.8);

    let outcome = h.service.classify(&fields).unwrap();
    assert_eq!(outcome.label(), ClassificationLabel::Candidate);
    assert!(outcome.confidence() >= 0.5 && outcome.confidence() <= 1.0);
    assert!(outcome.probabilities_available());

    let sized = h.service.regress(&outcome, &RawFields::new()).unwrap();
    assert!((sized.radius() - 2.26).abs() < 1e-9);
    assert!(sized.radius() > 0.0);
    assert!(CategoryScheme::Display.labels().contains(&sized.planet_type()));
    assert_eq!(sized.planet_type(), "Mini-Neptune");

    let record = h.service.record_outcome(&outcome, Some(&sized)).await.unwrap();
    let history = h.service.list_history(10).await.unwrap();
    assert_eq!(history, vec![record]);
    assert_eq!(history[0].radius(), Some(sized.radius()));
}

#[tokio::test]
async fn test_false_positive_is_recorded_without_regression() {
    let h = harness();

    let record = h.service.classify_and_size(&observation(2.0)).await.unwrap();

    assert_eq!(record.label(), ClassificationLabel::FalsePositive);
    assert!(record.radius().is_none());
    assert!(record.planet_type().is_none());
    assert_eq!(h.regressor.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.service.list_history(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_regress_without_positive_classification_fails() {
    let h = harness();
    let outcome = h.service.classify(&observation(2.0)).unwrap();

    let result = h.service.regress(&outcome, &observation(2.0));
    assert!(matches!(result, Err(PredictionError::InvalidState)));
    assert_eq!(h.regressor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_regression_fields_can_arrive_after_classification() {
    let h = harness();
    let mut fields = observation(35.8);
    fields.remove("koi_teq");
    fields.remove("koi_insol");

    let outcome = h.service.classify(&fields).unwrap();
    assert!(matches!(
        h.service.regress(&outcome, &RawFields::new()),
        Err(PredictionError::MissingFeature { .. })
    ));

    let later: RawFields = [
        ("koi_teq".to_string(), RawValue::from("793")),
        ("koi_insol".to_string(), RawValue::from("93.6")),
    ]
    .into();
    let sized = h.service.regress(&outcome, &later).unwrap();
    assert!((sized.radius() - 2.26).abs() < 1e-9);
}

#[tokio::test]
async fn test_failed_runs_leave_history_untouched() {
    let h = harness();
    h.service.classify_and_size(&observation(35.8)).await.unwrap();

    let mut invalid = observation(35.8);
    invalid.insert("koi_depth".to_string(), RawValue::from("deep"));
    assert!(matches!(
        h.service.classify_and_size(&invalid).await,
        Err(PredictionError::Validation { field, .. }) if field == "depth"
    ));

    let mut incomplete = observation(35.8);
    incomplete.remove("koi_insol");
    assert!(matches!(
        h.service.classify_and_size(&incomplete).await,
        Err(PredictionError::MissingFeature { field }) if field == "insol"
    ));

    assert_eq!(h.service.list_history(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_history_then_list_is_empty() {
    let h = harness();
    h.service.classify_and_size(&observation(35.8)).await.unwrap();
    h.service.classify_and_size(&observation(2.0)).await.unwrap();

    h.service.clear_history().await.unwrap();
    assert!(h.service.list_history(10).await.unwrap().is_empty());
}
