use serde::Deserialize;
use shared::features::choices;
use shared::{Feature, FeatureRecord, FeatureValue};
use std::collections::{BTreeMap, HashMap};

use super::encoder::CategoricalEncoders;
use crate::artifacts::ArtifactError;
use crate::config::UnseenCategoryPolicy;
use crate::error::PredictionError;

/// A record turned into numbers, with the column each number belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord<'a> {
    columns: Vec<&'a str>,
    values: Vec<f64>,
}

impl<'a> EncodedRecord<'a> {
    pub fn new(columns: Vec<&'a str>, values: Vec<f64>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn columns(&self) -> &[&'a str] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i])
    }
}

/// Turns a raw record into the numeric row layout the scaler was fitted on.
pub trait FeatureAligner: Send + Sync {
    fn align(&self, record: &FeatureRecord) -> Result<EncodedRecord<'_>, PredictionError>;
}

fn raw_columns() -> Vec<String> {
    Feature::all().map(|f| f.column().to_string()).collect()
}

fn mismatch(expected: &[String], actual: Vec<String>) -> PredictionError {
    PredictionError::FeatureOrderMismatch {
        expected: expected.to_vec(),
        actual,
    }
}

/// Replaces each categorical value with its code from a per-column encoder.
pub struct LabelEncodeAligner {
    columns: Vec<String>,
    encoders: CategoricalEncoders,
}

impl LabelEncodeAligner {
    pub fn new(columns: Vec<String>, encoders: CategoricalEncoders) -> Self {
        Self { columns, encoders }
    }
}

impl FeatureAligner for LabelEncodeAligner {
    fn align(&self, record: &FeatureRecord) -> Result<EncodedRecord<'_>, PredictionError> {
        let mut columns = Vec::with_capacity(self.columns.len());
        let mut values = Vec::with_capacity(self.columns.len());

        for column in &self.columns {
            let feature = Feature::from_column(column)
                .ok_or_else(|| mismatch(&self.columns, raw_columns()))?;
            let value = match record.value(feature) {
                FeatureValue::Numeric(v) => v,
                FeatureValue::Categorical(category) => self
                    .encoders
                    .get(column)
                    .ok_or_else(|| mismatch(&self.columns, raw_columns()))?
                    .encode(category)?,
            };
            columns.push(column.as_str());
            values.push(value);
        }

        if columns.len() != Feature::all().count() {
            return Err(mismatch(&self.columns, raw_columns()));
        }
        Ok(EncodedRecord::new(columns, values))
    }
}

/// Dummy columns of a one-hot training run.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnManifest {
    pub columns: Vec<String>,
    /// Categories dropped at training time; they encode as all zeros.
    #[serde(default)]
    pub baseline: BTreeMap<String, String>,
}

/// Expands categorical values into indicator columns named
/// `{column}_{value}`, then reorders to the fitted column list.
pub struct OneHotAligner {
    manifest: Vec<String>,
    index: HashMap<String, usize>,
    baseline: BTreeMap<String, String>,
    fitted: Vec<String>,
    policy: UnseenCategoryPolicy,
}

impl OneHotAligner {
    pub fn new(
        manifest: ColumnManifest,
        fitted: Vec<String>,
        policy: UnseenCategoryPolicy,
    ) -> Result<Self, ArtifactError> {
        let mut index = HashMap::with_capacity(manifest.columns.len());
        for (i, column) in manifest.columns.iter().enumerate() {
            if index.insert(column.clone(), i).is_some() {
                return Err(ArtifactError::Invalid(format!(
                    "column manifest lists {} twice",
                    column
                )));
            }
        }
        for (column, category) in &manifest.baseline {
            let invalid = |reason: &str| {
                ArtifactError::Invalid(format!(
                    "column manifest baseline {}={}: {}",
                    column, category, reason
                ))
            };
            let feature = Feature::from_column(column).ok_or_else(|| invalid("unknown feature"))?;
            if !feature.is_categorical() {
                return Err(invalid("feature is numeric"));
            }
            if !choices(feature).iter().any(|c| *c == category.as_str()) {
                return Err(invalid("unknown category"));
            }
            if index.contains_key(&format!("{}_{}", column, category)) {
                return Err(invalid("category also has an indicator column"));
            }
        }

        Ok(Self {
            manifest: manifest.columns,
            index,
            baseline: manifest.baseline,
            fitted,
            policy,
        })
    }

    fn lookup(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    fn is_baseline(&self, feature: Feature, category: &str) -> bool {
        self.baseline
            .get(feature.column())
            .is_some_and(|b| b == category)
    }
}

impl FeatureAligner for OneHotAligner {
    fn align(&self, record: &FeatureRecord) -> Result<EncodedRecord<'_>, PredictionError> {
        let mut row = vec![0.0; self.manifest.len()];

        for feature in Feature::all() {
            match record.value(feature) {
                FeatureValue::Numeric(v) => {
                    let i = self
                        .lookup(feature.column())
                        .ok_or_else(|| mismatch(&self.fitted, self.manifest.clone()))?;
                    row[i] = v;
                }
                FeatureValue::Categorical(category) => {
                    let dummy = format!("{}_{}", feature.column(), category);
                    match self.lookup(&dummy) {
                        Some(i) => row[i] = 1.0,
                        None if self.is_baseline(feature, category) => {}
                        None => match self.policy {
                            UnseenCategoryPolicy::Reject => {
                                return Err(PredictionError::UnseenCategory {
                                    column: feature.column().to_string(),
                                    value: category.to_string(),
                                });
                            }
                            UnseenCategoryPolicy::ZeroIndicator => {
                                log::warn!(
                                    "No indicator column {}; encoding {} as all zeros",
                                    dummy,
                                    feature
                                );
                            }
                        },
                    }
                }
            }
        }

        let mut columns = Vec::with_capacity(self.fitted.len());
        let mut values = Vec::with_capacity(self.fitted.len());
        for column in &self.fitted {
            let i = self
                .lookup(column)
                .ok_or_else(|| mismatch(&self.fitted, self.manifest.clone()))?;
            columns.push(column.as_str());
            values.push(row[i]);
        }
        Ok(EncodedRecord::new(columns, values))
    }
}
