//! In-Memory Repository Implementation
//!
//! Thread-safe, in-memory implementation of `PredictionHistoryRepository`.
//!
//! # Features
//!
//! - **Thread-safe**: Uses `Arc<RwLock>` for concurrent access
//! - **Atomic appends**: insert and trim happen under a single write lock
//! - **Testing**: Ideal for unit tests and ephemeral runs
//!
//! # Limitations
//!
//! - Data is lost on application restart
//! - No persistence across multiple instances
//!
//! For durable history, use `SqlitePredictionHistoryRepository`.

use crate::domain::prediction::PredictionRecord;
use crate::domain::repositories::PredictionHistoryRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records kept in append order, oldest first.
pub struct InMemoryPredictionHistoryRepository {
    records: Arc<RwLock<Vec<PredictionRecord>>>,
}

impl InMemoryPredictionHistoryRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryPredictionHistoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionHistoryRepository for InMemoryPredictionHistoryRepository {
    async fn insert_bounded(&self, record: &PredictionRecord, cap: usize) -> Result<u64> {
        let mut records = self.records.write().await;

        records.push(record.clone());

        let excess = records.len().saturating_sub(cap);
        records.drain(..excess);
        Ok(excess as u64)
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }

    async fn clear(&self) -> Result<u64> {
        let mut records = self.records.write().await;
        let deleted = records.len() as u64;
        records.clear();
        Ok(deleted)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
