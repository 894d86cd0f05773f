use thiserror::Error;

/// Errors surfaced by the inference pipeline and the prediction history.
///
/// Every variant carries a human-readable cause and is reported to the caller
/// as-is. None of them are retried: inference is deterministic and local.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("No confirmed candidate to size: regression requires a positive classification")]
    InvalidState,

    #[error("Missing regression feature: {field}")]
    MissingFeature { field: String },

    #[error("History storage failed: {reason}")]
    Storage { reason: String },

    #[error("{model} failed: {reason}")]
    Model { model: String, reason: String },
}

impl PredictionError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn model(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Model {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a persistence failure, keeping the whole context chain.
    pub fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            reason: format!("{:#}", err),
        }
    }
}

pub type PredictionResult<T> = Result<T, PredictionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_validation_error_names_field() {
        let err = PredictionError::validation("depth", "not a number: 'abc'");
        let msg = err.to_string();
        assert!(msg.contains("depth"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_storage_error_keeps_context_chain() {
        let inner: anyhow::Result<()> = Err(anyhow::anyhow!("disk I/O error"));
        let err = PredictionError::storage(inner.context("Failed to append record").unwrap_err());

        let msg = err.to_string();
        assert!(msg.contains("Failed to append record"));
        assert!(msg.contains("disk I/O error"));
    }

    #[test]
    fn test_invalid_state_message() {
        let msg = PredictionError::InvalidState.to_string();
        assert!(msg.contains("No confirmed candidate to size"));
    }
}
