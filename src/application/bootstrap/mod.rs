//! Startup wiring: history persistence and the fitted model bundle.

mod persistence;

pub use persistence::{PersistenceBootstrap, PersistenceHandle};

use crate::application::history_store::HistoryStore;
use crate::application::prediction_service::PredictionService;
use crate::config::{Config, HistoryEnvConfig};
use crate::infrastructure::ml::ModelBundle;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// History-only services; usable without any model artifacts.
pub async fn build_history(config: &HistoryEnvConfig) -> Result<Arc<HistoryStore>> {
    let persistence = PersistenceBootstrap::init(&config.database_url).await?;
    Ok(Arc::new(HistoryStore::new(
        persistence.history_repository,
        config.cap,
    )))
}

/// Loads the models and opens the history database.
pub async fn build_service(config: &Config) -> Result<PredictionService> {
    let history = build_history(&config.history).await?;

    let bundle = ModelBundle::load(&config.models).context("Failed to load model bundle")?;
    let pipeline = Arc::new(bundle.into_pipeline(&config.models));
    info!(
        "Inference pipeline ready (candidate class {}, {} categories, history cap {})",
        pipeline.label_mapping().candidate_class(),
        pipeline.category_scheme(),
        history.cap()
    );

    Ok(PredictionService::new(pipeline, history))
}
