pub mod cache;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use shared::Profile;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::pipeline::aligner::{ColumnManifest, FeatureAligner, LabelEncodeAligner, OneHotAligner};
use crate::pipeline::encoder::{CategoricalEncoders, TargetEncoder, TargetEncoderArtifact};
use crate::pipeline::forest::{ModelArtifact, RandomForest};
use crate::pipeline::scaler::{Scaler, ScalerArtifact};
use crate::pipeline::Pipeline;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact file not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("Failed to read artifact {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("Malformed artifact {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
    #[error("Invalid artifact set: {0}")]
    Invalid(String),
}

/// Reads artifact files and fingerprints everything it has read.
struct ArtifactReader {
    hasher: Sha256,
}

impl ArtifactReader {
    fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    fn read<T: DeserializeOwned>(&mut self, path: &Path) -> Result<T, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ArtifactError::Missing {
                path: path.to_path_buf(),
            },
            _ => ArtifactError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;
        self.hasher.update(&bytes);
        serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn digest(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

/// Loads and cross-checks the artifact set of the configured profile.
pub fn load_pipeline(config: &PipelineConfig) -> Result<Pipeline, ArtifactError> {
    let files = &config.files;
    let mut reader = ArtifactReader::new();

    let model: ModelArtifact = reader.read(&config.artifact_path(&files.model))?;
    let scaler: ScalerArtifact = reader.read(&config.artifact_path(&files.scaler))?;
    let target: TargetEncoderArtifact = reader.read(&config.artifact_path(&files.target_encoder))?;

    let model = RandomForest::from_artifact(model)?;
    let scaler = Scaler::from_artifact(scaler)?;
    let target = TargetEncoder::from_artifact(target)?;
    let fitted_columns = scaler.feature_names().to_vec();

    let aligner: Box<dyn FeatureAligner> = match config.profile {
        Profile::LabelEncode => {
            let encoders =
                reader.read(&config.artifact_path(&files.categorical_encoders))?;
            Box::new(LabelEncodeAligner::new(
                fitted_columns,
                CategoricalEncoders::from_artifact(encoders)?,
            ))
        }
        Profile::OneHot => {
            let manifest: ColumnManifest = reader.read(&config.artifact_path(&files.columns))?;
            Box::new(OneHotAligner::new(
                manifest,
                fitted_columns,
                config.unseen_category,
            )?)
        }
    };

    Pipeline::new(config.profile, aligner, scaler, model, target, reader.digest())
}
