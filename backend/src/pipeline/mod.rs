pub mod aligner;
pub mod encoder;
pub mod forest;
pub mod scaler;

#[cfg(test)]
pub mod fixtures;

use shared::{FeatureRecord, ObesityLevel, Profile};

use crate::artifacts::ArtifactError;
use crate::error::PredictionError;
use aligner::FeatureAligner;
use encoder::TargetEncoder;
use forest::RandomForest;
use scaler::Scaler;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: ObesityLevel,
    pub class_index: usize,
    /// Probability of every known class, in target-encoder order.
    pub probabilities: Vec<(ObesityLevel, f64)>,
}

impl Prediction {
    pub fn confidence(&self) -> f64 {
        self.probabilities
            .get(self.class_index)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }
}

/// Align → scale → classify → decode, over one immutable artifact set.
pub struct Pipeline {
    profile: Profile,
    aligner: Box<dyn FeatureAligner>,
    scaler: Scaler,
    model: RandomForest,
    target: TargetEncoder,
    digest: String,
}

impl Pipeline {
    pub fn new(
        profile: Profile,
        aligner: Box<dyn FeatureAligner>,
        scaler: Scaler,
        model: RandomForest,
        target: TargetEncoder,
        digest: String,
    ) -> Result<Self, ArtifactError> {
        if model.n_features() != scaler.width() {
            return Err(ArtifactError::Invalid(format!(
                "model expects {} features but scaler was fitted on {}",
                model.n_features(),
                scaler.width()
            )));
        }
        if model.n_classes() != target.classes().len() {
            return Err(ArtifactError::Invalid(format!(
                "model predicts {} classes but target encoder knows {}",
                model.n_classes(),
                target.classes().len()
            )));
        }
        Ok(Self {
            profile,
            aligner,
            scaler,
            model,
            target,
            digest,
        })
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn classes(&self) -> &[ObesityLevel] {
        self.target.classes()
    }

    pub fn fitted_columns(&self) -> &[String] {
        self.scaler.feature_names()
    }

    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction, PredictionError> {
        record
            .validate()
            .map_err(|e| PredictionError::InvalidInput(e.to_string()))?;

        let encoded = self.aligner.align(record)?;
        let fitted = self.scaler.feature_names();
        if encoded.len() != fitted.len()
            || encoded.columns().iter().zip(fitted).any(|(a, b)| *a != b.as_str())
        {
            return Err(PredictionError::FeatureOrderMismatch {
                expected: fitted.to_vec(),
                actual: encoded.columns().iter().map(|c| c.to_string()).collect(),
            });
        }

        let scaled = self.scaler.transform(&encoded)?;
        let (class_index, proba) = self.model.predict(scaled.view())?;
        let label = self.target.decode(class_index)?;
        let probabilities = self
            .target
            .classes()
            .iter()
            .copied()
            .zip(proba.iter().copied())
            .collect();

        Ok(Prediction {
            label,
            class_index,
            probabilities,
        })
    }
}
