use serde::{Deserialize, Serialize};
use shared::Profile;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: PathBuf,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub profile: Profile,
    #[serde(default)]
    pub unseen_category: UnseenCategoryPolicy,
    pub artifact_dir: PathBuf,
    #[serde(default)]
    pub files: ArtifactFiles,
}

/// What the one-hot aligner does with a category that has no dummy column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseenCategoryPolicy {
    #[default]
    Reject,
    /// Leave every indicator of the feature at 0. This silently changes the
    /// input the model sees.
    ZeroIndicator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactFiles {
    pub model: String,
    pub scaler: String,
    pub categorical_encoders: String,
    pub target_encoder: String,
    pub columns: String,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            model: "model.json".to_string(),
            scaler: "scaler.json".to_string(),
            categorical_encoders: "categorical_encoders.json".to_string(),
            target_encoder: "target_encoder.json".to_string(),
            columns: "columns.json".to_string(),
        }
    }
}

fn default_frontend_dir() -> PathBuf {
    PathBuf::from("frontend/dist")
}

impl PipelineConfig {
    pub fn artifact_path(&self, file: &str) -> PathBuf {
        self.artifact_dir.join(file)
    }
}

impl AppConfig {
    /// Loads the YAML config and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        log::info!("Loading configuration from {}", path.display());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("APP_CONFIG") {
            return PathBuf::from(path);
        }
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let path = PathBuf::from(format!("{}/../config/app.yaml", manifest_dir));
            if path.exists() {
                return path;
            }
        }
        PathBuf::from("config/app.yaml")
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // config/app.yaml sits one level below the directory relative paths
        // are written against.
        let base = path
            .parent()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new(""));
        Self::from_yaml_str(&config_str, base)
    }

    pub fn from_yaml_str(config_str: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: AppConfig = serde_yaml::from_str(config_str)?;
        config.frontend_dir = resolve(base, &config.frontend_dir);
        config.pipeline.artifact_dir = resolve(base, &config.pipeline.artifact_dir);
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(profile) = lookup("PIPELINE_PROFILE") {
            self.pipeline.profile = profile.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PIPELINE_PROFILE".to_string(),
                value: profile.clone(),
            })?;
        }
        if let Some(dir) = lookup("ARTIFACT_DIR") {
            self.pipeline.artifact_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.frontend_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const YAML: &str = r#"
server:
  host: 127.0.0.1
  port: 9000
pipeline:
  profile: one_hot
  unseen_category: zero_indicator
  artifact_dir: artifacts/one_hot
  files:
    model: forest.json
"#;

    #[test]
    fn parses_yaml_and_resolves_paths() {
        let config = AppConfig::from_yaml_str(YAML, Path::new("/srv/app")).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.pipeline.profile, Profile::OneHot);
        assert_eq!(
            config.pipeline.unseen_category,
            UnseenCategoryPolicy::ZeroIndicator
        );
        assert_eq!(
            config.pipeline.artifact_dir,
            PathBuf::from("/srv/app/artifacts/one_hot")
        );
        assert_eq!(config.frontend_dir, PathBuf::from("/srv/app/frontend/dist"));
        assert_eq!(config.pipeline.files.model, "forest.json");
        assert_eq!(config.pipeline.files.scaler, "scaler.json");
        assert_eq!(
            config.pipeline.artifact_path(&config.pipeline.files.model),
            PathBuf::from("/srv/app/artifacts/one_hot/forest.json")
        );
    }

    #[test]
    fn server_and_policy_have_defaults() {
        let yaml = "pipeline:\n  profile: label_encode\n  artifact_dir: /opt/artifacts\n";
        let config = AppConfig::from_yaml_str(yaml, Path::new("/srv/app")).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
        assert_eq!(config.pipeline.unseen_category, UnseenCategoryPolicy::Reject);
        assert_eq!(config.pipeline.artifact_dir, PathBuf::from("/opt/artifacts"));
    }

    #[test]
    fn env_overrides_win() {
        let mut config = AppConfig::from_yaml_str(YAML, Path::new("/srv/app")).unwrap();
        let env: HashMap<&str, &str> = [
            ("PORT", "8088"),
            ("PIPELINE_PROFILE", "label_encode"),
            ("ARTIFACT_DIR", "/data/le"),
        ]
        .into_iter()
        .collect();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.pipeline.profile, Profile::LabelEncode);
        assert_eq!(config.pipeline.artifact_dir, PathBuf::from("/data/le"));
    }

    #[test]
    fn bad_override_is_reported() {
        let mut config = AppConfig::from_yaml_str(YAML, Path::new("/srv/app")).unwrap();
        let err = config
            .apply_env_overrides(|key| (key == "PIPELINE_PROFILE").then(|| "both".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "PIPELINE_PROFILE"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::from_file(Path::new("/nonexistent/config/app.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn shipped_config_points_at_shipped_artifacts() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/app.yaml");
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.pipeline.profile, Profile::LabelEncode);
        assert!(config
            .pipeline
            .artifact_path(&config.pipeline.files.model)
            .exists());
    }
}
