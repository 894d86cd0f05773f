//! Observation feature registry and validation.
//!
//! The column orders below are fixed by the fitted model artifacts.
//! Any change here is a breaking change for the classifier, the regressor
//! and the x-scaler.

use crate::domain::errors::{PredictionError, PredictionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered classification columns.
pub const CLASSIFICATION_FEATURES: [&str; 9] = [
    "period",
    "time0bk",
    "impact",
    "duration",
    "depth",
    "model_snr",
    "steff",
    "slogg",
    "srad",
];

/// Ordered regression columns (classification columns without `time0bk`,
/// followed by `teq` and `insol`).
pub const REGRESSION_FEATURES: [&str; 10] = [
    "period",
    "impact",
    "duration",
    "depth",
    "model_snr",
    "steff",
    "slogg",
    "srad",
    "teq",
    "insol",
];

/// Fields only the regressor consumes.
pub const REGRESSION_ONLY_FEATURES: [&str; 2] = ["teq", "insol"];

/// Prefix used by the Kepler Objects of Interest catalogue column names.
const CATALOGUE_PREFIX: &str = "koi_";

/// A raw form or JSON value before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// Field name -> raw input, as collected by the caller.
pub type RawFields = HashMap<String, RawValue>;

/// Looks a field up by its short name, falling back to the `koi_` catalogue name.
fn lookup<'a>(fields: &'a RawFields, name: &str) -> Option<&'a RawValue> {
    fields
        .get(name)
        .or_else(|| fields.get(&format!("{}{}", CATALOGUE_PREFIX, name)))
}

/// Parses one field into a finite real. Blank text counts as missing.
fn parse_field(fields: &RawFields, name: &str) -> PredictionResult<Option<f64>> {
    let value = match lookup(fields, name) {
        None => return Ok(None),
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse::<f64>().map_err(|_| {
                PredictionError::validation(name, format!("not a number: '{}'", trimmed))
            })?
        }
    };

    if !value.is_finite() {
        return Err(PredictionError::validation(
            name,
            format!("must be finite, got {}", value),
        ));
    }
    Ok(Some(value))
}

fn require_field(fields: &RawFields, name: &str) -> PredictionResult<f64> {
    parse_field(fields, name)?.ok_or_else(|| PredictionError::validation(name, "missing value"))
}

/// A validated observation.
///
/// The nine classification fields are always present. `teq` and `insol` are
/// only needed for regression and may be supplied later through
/// [`FeatureVector::with_regression_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    period: f64,
    time0bk: f64,
    impact: f64,
    duration: f64,
    depth: f64,
    model_snr: f64,
    steff: f64,
    slogg: f64,
    srad: f64,
    teq: Option<f64>,
    insol: Option<f64>,
}

impl FeatureVector {
    /// Validates the classification fields, plus `teq`/`insol` when present.
    ///
    /// Fails on the first missing or non-numeric field, in column order.
    pub fn from_fields(fields: &RawFields) -> PredictionResult<Self> {
        let mut values = [0.0; 9];
        for (slot, name) in values.iter_mut().zip(CLASSIFICATION_FEATURES) {
            *slot = require_field(fields, name)?;
        }
        let [period, time0bk, impact, duration, depth, model_snr, steff, slogg, srad] = values;

        Ok(Self {
            period,
            time0bk,
            impact,
            duration,
            depth,
            model_snr,
            steff,
            slogg,
            srad,
            teq: parse_field(fields, "teq")?,
            insol: parse_field(fields, "insol")?,
        })
    }

    /// Validates all eleven fields.
    pub fn from_full_fields(fields: &RawFields) -> PredictionResult<Self> {
        let vector = Self::from_fields(fields)?;
        for name in REGRESSION_ONLY_FEATURES {
            if vector.value(name).is_none() {
                return Err(PredictionError::validation(name, "missing value"));
            }
        }
        Ok(vector)
    }

    /// Returns a copy with `teq`/`insol` taken from `additional` where given.
    pub fn with_regression_fields(&self, additional: &RawFields) -> PredictionResult<Self> {
        let mut merged = *self;
        if let Some(teq) = parse_field(additional, "teq")? {
            merged.teq = Some(teq);
        }
        if let Some(insol) = parse_field(additional, "insol")? {
            merged.insol = Some(insol);
        }
        Ok(merged)
    }

    pub fn has_regression_fields(&self) -> bool {
        self.teq.is_some() && self.insol.is_some()
    }

    /// Field value by short name.
    pub fn value(&self, name: &str) -> Option<f64> {
        match name {
            "period" => Some(self.period),
            "time0bk" => Some(self.time0bk),
            "impact" => Some(self.impact),
            "duration" => Some(self.duration),
            "depth" => Some(self.depth),
            "model_snr" => Some(self.model_snr),
            "steff" => Some(self.steff),
            "slogg" => Some(self.slogg),
            "srad" => Some(self.srad),
            "teq" => self.teq,
            "insol" => self.insol,
            _ => None,
        }
    }

    /// Classifier input in [`CLASSIFICATION_FEATURES`] order.
    pub fn to_classification_array(&self) -> [f64; 9] {
        [
            self.period,
            self.time0bk,
            self.impact,
            self.duration,
            self.depth,
            self.model_snr,
            self.steff,
            self.slogg,
            self.srad,
        ]
    }

    /// Regressor input in [`REGRESSION_FEATURES`] order.
    pub fn to_regression_array(&self) -> PredictionResult<[f64; 10]> {
        let teq = self.teq.ok_or_else(|| PredictionError::MissingFeature {
            field: "teq".to_string(),
        })?;
        let insol = self.insol.ok_or_else(|| PredictionError::MissingFeature {
            field: "insol".to_string(),
        })?;

        Ok([
            self.period,
            self.impact,
            self.duration,
            self.depth,
            self.model_snr,
            self.steff,
            self.slogg,
            self.srad,
            teq,
            insol,
        ])
    }
}
