use shared::Profile;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{load_pipeline, ArtifactError};
use crate::config::PipelineConfig;
use crate::pipeline::Pipeline;

/// Process-wide artifact bundle. The first caller loads it; everyone after
/// that gets the same pipeline, or the same error. Failed loads are not
/// retried.
pub struct ArtifactCache {
    config: PipelineConfig,
    cell: OnceCell<Result<Arc<Pipeline>, ArtifactError>>,
}

impl ArtifactCache {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cell: OnceCell::new(),
        }
    }

    /// A cache whose load already happened.
    #[cfg(test)]
    pub fn preloaded(config: PipelineConfig, loaded: Result<Pipeline, ArtifactError>) -> Self {
        Self {
            config,
            cell: OnceCell::new_with(Some(loaded.map(Arc::new))),
        }
    }

    pub fn profile(&self) -> Profile {
        self.config.profile
    }

    pub async fn get(&self) -> Result<Arc<Pipeline>, ArtifactError> {
        self.cell
            .get_or_init(|| async {
                log::info!(
                    "Loading {:?} artifacts from {}",
                    self.config.profile,
                    self.config.artifact_dir.display()
                );
                match load_pipeline(&self.config) {
                    Ok(pipeline) => {
                        log::info!(
                            "Artifacts loaded: {} columns, {} classes, digest {}",
                            pipeline.fitted_columns().len(),
                            pipeline.classes().len(),
                            pipeline.digest()
                        );
                        Ok(Arc::new(pipeline))
                    }
                    Err(e) => {
                        log::error!("Failed to load artifacts: {}", e);
                        Err(e)
                    }
                }
            })
            .await
            .clone()
    }
}
