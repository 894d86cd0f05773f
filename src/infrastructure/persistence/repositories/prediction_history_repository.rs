use crate::domain::features::FeatureVector;
use crate::domain::planet::CategoryScheme;
use crate::domain::prediction::{ClassificationLabel, PredictionRecord};
use crate::domain::repositories::PredictionHistoryRepository;
use crate::infrastructure::persistence::database::Database;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

pub struct SqlitePredictionHistoryRepository {
    database: Database,
}

impl SqlitePredictionHistoryRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn map_row(row: &SqliteRow) -> Result<PredictionRecord> {
        let id: String = row.try_get("id")?;
        let timestamp_ms: i64 = row.try_get("timestamp")?;
        let label: String = row.try_get("label")?;
        let scheme: Option<String> = row.try_get("category_scheme")?;
        let features_json: String = row.try_get("features_json")?;

        let features: FeatureVector = serde_json::from_str(&features_json)
            .with_context(|| format!("Corrupt features for prediction {}", id))?;

        let record = PredictionRecord::restore(
            Uuid::parse_str(&id).with_context(|| format!("Invalid prediction id {}", id))?,
            DateTime::from_timestamp_millis(timestamp_ms)
                .with_context(|| format!("Invalid timestamp {} for prediction {}", timestamp_ms, id))?,
            ClassificationLabel::from_str(&label)?,
            row.try_get("confidence")?,
            row.try_get("positive_probability")?,
            row.try_get("radius")?,
            row.try_get("planet_type")?,
            scheme.as_deref().map(CategoryScheme::from_str).transpose()?,
            features,
        )
        .with_context(|| format!("Inconsistent stored prediction {}", id))?;
        Ok(record)
    }
}

#[async_trait]
impl PredictionHistoryRepository for SqlitePredictionHistoryRepository {
    async fn insert_bounded(&self, record: &PredictionRecord, cap: usize) -> Result<u64> {
        let features_json =
            serde_json::to_string(record.features()).context("Failed to serialize features")?;

        // `seq` is AUTOINCREMENT, so it never reuses a value and orders rows
        // by append. Dropping the transaction without commit rolls back both statements.
        let mut tx = self
            .database
            .pool
            .begin()
            .await
            .context("Failed to begin history transaction")?;

        sqlx::query(
            r#"
            INSERT INTO prediction_history
            (id, timestamp, label, confidence, positive_probability, radius, planet_type, category_scheme, features_json)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id().to_string())
        .bind(record.timestamp().timestamp_millis())
        .bind(record.label().as_str())
        .bind(record.confidence())
        .bind(record.positive_probability())
        .bind(record.radius())
        .bind(record.planet_type())
        .bind(record.category_scheme().map(|s| s.to_string()))
        .bind(features_json)
        .execute(&mut *tx)
        .await
        .context("Failed to save prediction record")?;

        let trimmed = sqlx::query(
            r#"
            DELETE FROM prediction_history
            WHERE seq IN (
                SELECT seq FROM prediction_history
                ORDER BY seq DESC
                LIMIT -1 OFFSET ?
            )
            "#,
        )
        .bind(cap as i64)
        .execute(&mut *tx)
        .await
        .context("Failed to trim prediction history")?;

        tx.commit()
            .await
            .context("Failed to commit history transaction")?;

        debug!(
            "Persisted prediction {} (trimmed {})",
            record.id(),
            trimmed.rows_affected()
        );
        Ok(trimmed.rows_affected())
    }

    async fn find_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM prediction_history ORDER BY seq DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.database.pool)
        .await
        .context("Failed to load prediction history")?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM prediction_history WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.database.pool)
            .await
            .context("Failed to delete prediction record")?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM prediction_history")
            .execute(&self.database.pool)
            .await
            .context("Failed to clear prediction history")?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM prediction_history")
            .fetch_one(&self.database.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }
}
