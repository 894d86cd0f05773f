use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::domain::repositories::PredictionHistoryRepository;
use crate::infrastructure::persistence::database::Database;
use crate::infrastructure::persistence::repositories::SqlitePredictionHistoryRepository;

pub struct PersistenceHandle {
    pub db: Database,
    pub history_repository: Arc<dyn PredictionHistoryRepository>,
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(db_url: &str) -> Result<PersistenceHandle> {
        info!("Initializing Database at {}", db_url);

        let db = Database::new(db_url)
            .await
            .context("Failed to initialize database")?;

        let history_repository = Arc::new(SqlitePredictionHistoryRepository::new(db.clone()));

        Ok(PersistenceHandle {
            db,
            history_repository,
        })
    }
}
