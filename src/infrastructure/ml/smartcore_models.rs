use crate::domain::ports::{Classifier, Regressor};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

type ForestClassifier = RandomForestClassifier<f64, i64, DenseMatrix<f64>, Vec<i64>>;
type ForestRegressor = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Smartcore models are persisted with serde_json.
fn load_json_model<M: DeserializeOwned>(path: &Path) -> Result<M> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open model file {:?}", path))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)
        .with_context(|| format!("Failed to read model file {:?}", path))?;

    serde_json::from_reader(std::io::Cursor::new(&buffer))
        .with_context(|| format!("Failed to deserialize model {:?}", path))
}

fn single_row(features: &[f64]) -> Result<DenseMatrix<f64>, String> {
    DenseMatrix::from_2d_vec(&vec![features.to_vec()])
        .map_err(|e| format!("Matrix creation failed: {}", e))
}

/// Random forest classifier. Exposes no class probabilities.
pub struct SmartCoreClassifier {
    model: ForestClassifier,
}

impl SmartCoreClassifier {
    pub fn load(path: &Path) -> Result<Self> {
        let model = load_json_model(path)?;
        info!("Successfully loaded classification model from {:?}", path);
        Ok(Self { model })
    }
}

impl Classifier for SmartCoreClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, String> {
        let input = single_row(features)?;
        match self.model.predict(&input) {
            Ok(predictions) => predictions
                .first()
                .copied()
                .ok_or_else(|| "No prediction returned".to_string()),
            Err(e) => Err(format!("Prediction failed: {}", e)),
        }
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest Classifier"
    }
}

/// Random forest regressor predicting the scaled planet radius.
pub struct SmartCoreRegressor {
    model: ForestRegressor,
}

impl SmartCoreRegressor {
    pub fn load(path: &Path) -> Result<Self> {
        let model = load_json_model(path)?;
        info!("Successfully loaded regression model from {:?}", path);
        Ok(Self { model })
    }
}

impl Regressor for SmartCoreRegressor {
    fn predict(&self, scaled_features: &[f64]) -> Result<f64, String> {
        let input = single_row(scaled_features)?;
        match self.model.predict(&input) {
            Ok(predictions) => predictions
                .first()
                .copied()
                .ok_or_else(|| "No prediction returned".to_string()),
            Err(e) => Err(format!("Prediction failed: {}", e)),
        }
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest Regressor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::ensemble::random_forest_classifier::RandomForestClassifierParameters;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;

    fn training_rows() -> DenseMatrix<f64> {
        let rows: Vec<Vec<f64>> = (0..40)
            .map(|i| {
                let x = i as f64;
                vec![x, 100.0 - x, (i % 3) as f64]
            })
            .collect();
        DenseMatrix::from_2d_vec(&rows).unwrap()
    }

    fn temp_model_path(kind: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("spaceml_{}_{}.json", kind, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_classifier_loads_and_predicts_training_classes() {
        let x = training_rows();
        let y: Vec<i64> = (0..40).map(|i| if i < 20 { 0 } else { 1 }).collect();
        let params = RandomForestClassifierParameters::default()
            .with_n_trees(10)
            .with_max_depth(4);
        let model = ForestClassifier::fit(&x, &y, params).unwrap();

        let path = temp_model_path("classifier");
        std::fs::write(&path, serde_json::to_vec(&model).unwrap()).unwrap();

        let classifier = SmartCoreClassifier::load(&path).unwrap();
        assert_eq!(classifier.predict(&[1.0, 99.0, 1.0]).unwrap(), 0);
        assert_eq!(classifier.predict(&[38.0, 62.0, 2.0]).unwrap(), 1);
        assert!(classifier.predict_probability(&[1.0, 99.0, 1.0]).is_none());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_regressor_loads_and_predicts() {
        let x = training_rows();
        let y: Vec<f64> = (0..40).map(|i| i as f64 * 0.1).collect();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(10)
            .with_max_depth(4);
        let model = ForestRegressor::fit(&x, &y, params).unwrap();

        let path = temp_model_path("regressor");
        std::fs::write(&path, serde_json::to_vec(&model).unwrap()).unwrap();

        let regressor = SmartCoreRegressor::load(&path).unwrap();
        let prediction = regressor.predict(&[20.0, 80.0, 2.0]).unwrap();
        assert!(prediction.is_finite());
        assert!((0.0..=3.9).contains(&prediction));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_model_file_is_an_error() {
        let path = temp_model_path("missing");
        assert!(SmartCoreClassifier::load(&path).is_err());
        assert!(SmartCoreRegressor::load(&path).is_err());
    }
}
