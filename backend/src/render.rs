use chrono::Utc;
use shared::severity::{self, DISCLAIMER};
use shared::{ClassProbability, PredictionResponse, Profile};
use uuid::Uuid;

use crate::pipeline::Prediction;

/// Turns a raw prediction into what the dashboard shows.
pub fn render(prediction: &Prediction, profile: Profile) -> PredictionResponse {
    let tier = severity::SeverityTier::classify(prediction.label.as_str());
    PredictionResponse {
        id: Uuid::new_v4(),
        label: prediction.label,
        tier,
        headline: severity::headline(prediction.label),
        advisory: tier.advisory().to_string(),
        disclaimer: DISCLAIMER.to_string(),
        confidence: prediction.confidence(),
        probabilities: prediction
            .probabilities
            .iter()
            .map(|&(label, probability)| ClassProbability { label, probability })
            .collect(),
        profile,
        predicted_at: Utc::now(),
    }
}
