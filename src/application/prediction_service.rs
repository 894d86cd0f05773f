//! Caller-facing facade over the pipeline and the history store.
//!
//! History is only written after a run has fully succeeded, so a failed
//! classification or regression never mutates it.

use crate::application::history_store::HistoryStore;
use crate::application::inference_pipeline::InferencePipeline;
use crate::domain::errors::PredictionResult;
use crate::domain::features::RawFields;
use crate::domain::prediction::{ClassificationOutcome, PredictionRecord, RegressionOutcome};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct PredictionService {
    pipeline: Arc<InferencePipeline>,
    history: Arc<HistoryStore>,
}

impl PredictionService {
    pub fn new(pipeline: Arc<InferencePipeline>, history: Arc<HistoryStore>) -> Self {
        Self { pipeline, history }
    }

    pub fn pipeline(&self) -> &InferencePipeline {
        &self.pipeline
    }

    pub fn classify(&self, fields: &RawFields) -> PredictionResult<ClassificationOutcome> {
        self.pipeline.classify(fields)
    }

    pub fn regress(
        &self,
        outcome: &ClassificationOutcome,
        additional: &RawFields,
    ) -> PredictionResult<RegressionOutcome> {
        self.pipeline.regress(outcome, additional)
    }

    /// Persists a completed run and trims the history to its cap.
    pub async fn record_outcome(
        &self,
        classification: &ClassificationOutcome,
        regression: Option<&RegressionOutcome>,
    ) -> PredictionResult<PredictionRecord> {
        let record = PredictionRecord::new(classification, regression)?;
        self.history.append(record).await
    }

    /// Full run on an observation: classify, size when positive, record.
    pub async fn classify_and_size(&self, fields: &RawFields) -> PredictionResult<PredictionRecord> {
        let (classification, regression) = self.pipeline.classify_and_size(fields)?;
        let record = self
            .record_outcome(&classification, regression.as_ref())
            .await?;

        match &regression {
            Some(sized) => info!(
                "Candidate sized at {:.2} R_earth ({})",
                sized.radius(),
                sized.planet_type()
            ),
            None => info!("Observation classified as {}", classification.label()),
        }
        Ok(record)
    }

    pub async fn list_history(&self, limit: usize) -> PredictionResult<Vec<PredictionRecord>> {
        self.history.list(limit).await
    }

    pub async fn clear_history(&self) -> PredictionResult<()> {
        self.history.clear().await
    }
}
