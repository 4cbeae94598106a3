use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::{ErrorKind, ErrorResponse};

use crate::artifacts::ArtifactError;

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("Model artifacts are not available: {0}")]
    Unavailable(#[from] ArtifactError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Feature order mismatch: model expects {expected:?}, got {actual:?}")]
    FeatureOrderMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Unseen category '{value}' for {column}")]
    UnseenCategory { column: String, value: String },
    #[error("Inference failed: {0}")]
    InferenceFailure(String),
}

impl PredictionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictionError::Unavailable(ArtifactError::Missing { .. }) => {
                ErrorKind::MissingArtifact
            }
            PredictionError::Unavailable(_) => ErrorKind::InvalidArtifact,
            PredictionError::InvalidInput(_) => ErrorKind::InvalidInput,
            PredictionError::FeatureOrderMismatch { .. } => ErrorKind::FeatureOrderMismatch,
            PredictionError::UnseenCategory { .. } => ErrorKind::UnseenCategory,
            PredictionError::InferenceFailure(_) => ErrorKind::InferenceFailure,
        }
    }
}

impl ResponseError for PredictionError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::MissingArtifact | ErrorKind::InvalidArtifact => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::UnseenCategory => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::FeatureOrderMismatch | ErrorKind::InferenceFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
        })
    }
}
