use ndarray::{Array1, ArrayView1};
use serde::Deserialize;
use std::collections::HashSet;

use super::aligner::EncodedRecord;
use crate::artifacts::ArtifactError;
use crate::error::PredictionError;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard {
        feature_names_in: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        feature_names_in: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
enum Transform {
    /// `(x - mean) / scale`
    Standard { mean: Array1<f64>, scale: Array1<f64> },
    /// `x * scale + min`
    MinMax { min: Array1<f64>, scale: Array1<f64> },
}

/// Fitted per-column affine transform. Its feature list is the column order
/// the model was trained on.
#[derive(Debug, Clone)]
pub struct Scaler {
    feature_names: Vec<String>,
    transform: Transform,
}

/// Model input after scaling, in fitted column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRecord(Array1<f64>);

impl ScaledRecord {
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }
}

fn check_vector(name: &str, values: &[f64], width: usize) -> Result<Array1<f64>, ArtifactError> {
    if values.len() != width {
        return Err(ArtifactError::Invalid(format!(
            "scaler {} has {} entries for {} features",
            name,
            values.len(),
            width
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ArtifactError::Invalid(format!(
            "scaler {} contains non-finite values",
            name
        )));
    }
    Ok(Array1::from(values.to_vec()))
}

fn check_scale(values: &[f64], width: usize) -> Result<Array1<f64>, ArtifactError> {
    let scale = check_vector("scale", values, width)?;
    if scale.iter().any(|&v| v == 0.0) {
        return Err(ArtifactError::Invalid("scaler scale contains zeros".into()));
    }
    Ok(scale)
}

impl Scaler {
    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self, ArtifactError> {
        let (feature_names, transform) = match artifact {
            ScalerArtifact::Standard {
                feature_names_in,
                mean,
                scale,
            } => {
                let width = feature_names_in.len();
                let transform = Transform::Standard {
                    mean: check_vector("mean", &mean, width)?,
                    scale: check_scale(&scale, width)?,
                };
                (feature_names_in, transform)
            }
            ScalerArtifact::MinMax {
                feature_names_in,
                min,
                scale,
            } => {
                let width = feature_names_in.len();
                let transform = Transform::MinMax {
                    min: check_vector("min", &min, width)?,
                    scale: check_scale(&scale, width)?,
                };
                (feature_names_in, transform)
            }
        };

        if feature_names.is_empty() {
            return Err(ArtifactError::Invalid("scaler has no features".into()));
        }
        let unique: HashSet<&str> = feature_names.iter().map(String::as_str).collect();
        if unique.len() != feature_names.len() {
            return Err(ArtifactError::Invalid(
                "scaler feature names are not unique".into(),
            ));
        }

        Ok(Self {
            feature_names,
            transform,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn width(&self) -> usize {
        self.feature_names.len()
    }

    pub fn transform(&self, record: &EncodedRecord<'_>) -> Result<ScaledRecord, PredictionError> {
        if record.len() != self.width() {
            return Err(PredictionError::InferenceFailure(format!(
                "scaler expects {} columns, got {}",
                self.width(),
                record.len()
            )));
        }
        let x = Array1::from(record.values().to_vec());
        let scaled = match &self.transform {
            Transform::Standard { mean, scale } => (x - mean) / scale,
            Transform::MinMax { min, scale } => x * scale + min,
        };
        if let Some(i) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(PredictionError::InferenceFailure(format!(
                "scaled value for {} is not finite",
                self.feature_names[i]
            )));
        }
        Ok(ScaledRecord(scaled))
    }
}
