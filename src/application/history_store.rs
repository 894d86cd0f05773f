//! Bounded prediction history.
//!
//! Appends are serialized: stamping and insert-then-trim run as one unit under
//! an async mutex, and the repository performs the insert and trim atomically.
//! The cap holds after every append even with concurrent callers, and the
//! record just appended is always the newest one kept.

use crate::domain::errors::{PredictionError, PredictionResult};
use crate::domain::prediction::PredictionRecord;
use crate::domain::repositories::PredictionHistoryRepository;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Default number of records kept.
pub const DEFAULT_HISTORY_CAP: usize = 10;

pub struct HistoryStore {
    repository: Arc<dyn PredictionHistoryRepository>,
    cap: usize,
    append_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(repository: Arc<dyn PredictionHistoryRepository>, cap: usize) -> Self {
        Self {
            repository,
            // A zero cap would evict every record as soon as it lands.
            cap: cap.max(1),
            append_lock: Mutex::new(()),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Stamps `record` with the current time, appends it and evicts the
    /// earliest-appended records beyond the cap. Returns the record as stored.
    pub async fn append(&self, record: PredictionRecord) -> PredictionResult<PredictionRecord> {
        let _guard = self.append_lock.lock().await;
        let record = record.stamped(Utc::now());

        let evicted = self
            .repository
            .insert_bounded(&record, self.cap)
            .await
            .map_err(|e| {
                error!("Failed to append prediction {}: {:#}", record.id(), e);
                PredictionError::storage(e)
            })?;

        info!(
            "Recorded prediction {} ({})",
            record.id(),
            record.label().as_str()
        );
        if evicted > 0 {
            warn!(
                "History over cap {}: evicted {} oldest record(s)",
                self.cap, evicted
            );
        }
        Ok(record)
    }

    /// Most recent `limit` records, newest first.
    pub async fn list(&self, limit: usize) -> PredictionResult<Vec<PredictionRecord>> {
        self.repository
            .find_recent(limit)
            .await
            .map_err(PredictionError::storage)
    }

    /// Deletes every record. Idempotent.
    pub async fn clear(&self) -> PredictionResult<()> {
        let _guard = self.append_lock.lock().await;

        let deleted = self.repository.clear().await.map_err(|e| {
            error!("Failed to clear prediction history: {:#}", e);
            PredictionError::storage(e)
        })?;
        info!("Cleared prediction history ({} record(s))", deleted);
        Ok(())
    }

    pub async fn len(&self) -> PredictionResult<usize> {
        self.repository
            .count()
            .await
            .map_err(PredictionError::storage)
    }

    pub async fn is_empty(&self) -> PredictionResult<bool> {
        Ok(self.len().await? == 0)
    }
}
