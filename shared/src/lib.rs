pub mod features;
pub mod form;
pub mod severity;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, IntoStaticStr};
use uuid::Uuid;

pub use features::{Feature, FeatureRecord, FeatureValue, RecordError};
pub use severity::{ObesityLevel, SeverityTier};

/// How categorical features are turned into numbers. Each artifact set was
/// produced for exactly one of these.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Profile {
    LabelEncode,
    OneHot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingArtifact,
    InvalidArtifact,
    InvalidInput,
    FeatureOrderMismatch,
    UnseenCategory,
    InferenceFailure,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClassProbability {
    pub label: ObesityLevel,
    pub probability: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionResponse {
    pub id: Uuid,
    pub label: ObesityLevel,
    pub tier: SeverityTier,
    pub headline: String,
    pub advisory: String,
    pub disclaimer: String,
    pub confidence: f64,
    pub probabilities: Vec<ClassProbability>,
    pub profile: Profile,
    pub predicted_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatusResponse {
    pub ready: bool,
    pub profile: Profile,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    pub artifact_digest: Option<String>,
    pub classes: Vec<ObesityLevel>,
}
