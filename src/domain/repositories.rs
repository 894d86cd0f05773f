//! Repository abstractions for prediction history persistence.
//!
//! `PredictionHistoryRepository` is implemented by SQLite for durable storage
//! and by an in-memory store for tests and ephemeral runs.
//!
//! # Example
//!
//! ```rust,no_run
//! use spaceml::domain::repositories::PredictionHistoryRepository;
//! use spaceml::infrastructure::InMemoryPredictionHistoryRepository;
//!
//! # async {
//! let repo = InMemoryPredictionHistoryRepository::new();
//! // repo.insert_bounded(&record, 10).await?;
//! let recent = repo.find_recent(10).await;
//! # };
//! ```

use crate::domain::prediction::PredictionRecord;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Insert-ordered storage for prediction records. Recency is append order.
#[async_trait]
pub trait PredictionHistoryRepository: Send + Sync {
    /// Insert a record, then delete the earliest-appended records beyond
    /// `cap`, as one atomic unit. Returns the number of records evicted.
    ///
    /// On error nothing is inserted or deleted.
    async fn insert_bounded(&self, record: &PredictionRecord, cap: usize) -> Result<u64>;

    /// Most recently appended records first.
    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>>;

    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;

    /// Delete every record. Returns the number deleted.
    async fn clear(&self) -> Result<u64>;

    async fn count(&self) -> Result<usize>;
}
