use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

pub const DISCLAIMER: &str = "Disclaimer: this prediction comes from a statistical model and does not replace a professional medical diagnosis.";

/// Target classes of the obesity dataset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
    IntoStaticStr,
)]
pub enum ObesityLevel {
    #[serde(rename = "Insufficient_Weight")]
    #[strum(serialize = "Insufficient_Weight")]
    InsufficientWeight,
    #[serde(rename = "Normal_Weight")]
    #[strum(serialize = "Normal_Weight")]
    NormalWeight,
    #[serde(rename = "Overweight_Level_I")]
    #[strum(serialize = "Overweight_Level_I")]
    OverweightLevelI,
    #[serde(rename = "Overweight_Level_II")]
    #[strum(serialize = "Overweight_Level_II")]
    OverweightLevelII,
    #[serde(rename = "Obesity_Type_I")]
    #[strum(serialize = "Obesity_Type_I")]
    ObesityTypeI,
    #[serde(rename = "Obesity_Type_II")]
    #[strum(serialize = "Obesity_Type_II")]
    ObesityTypeII,
    #[serde(rename = "Obesity_Type_III")]
    #[strum(serialize = "Obesity_Type_III")]
    ObesityTypeIII,
}

impl ObesityLevel {
    pub fn all() -> impl Iterator<Item = ObesityLevel> {
        ObesityLevel::iter()
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Parses a class name as written by the training pipeline.
    pub fn from_class(name: &str) -> Option<ObesityLevel> {
        ObesityLevel::from_str(name).ok()
    }

    pub fn tier(self) -> SeverityTier {
        SeverityTier::classify(self.as_str())
    }
}

impl fmt::Display for ObesityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    HighRisk,
    Caution,
    Healthy,
    Underweight,
}

impl SeverityTier {
    pub fn classify(label: &str) -> SeverityTier {
        if label.contains("Obesity") {
            SeverityTier::HighRisk
        } else if label.contains("Overweight") {
            SeverityTier::Caution
        } else if label.contains("Normal_Weight") {
            SeverityTier::Healthy
        } else {
            SeverityTier::Underweight
        }
    }

    pub fn advisory(self) -> &'static str {
        match self {
            SeverityTier::HighRisk => {
                "Based on the data entered, you are at high risk of obesity. Consulting a healthcare professional is recommended."
            }
            SeverityTier::Caution => {
                "You are in the overweight category. Improving your diet and increasing physical activity can help you reach an ideal weight."
            }
            SeverityTier::Healthy => {
                "Congratulations! Your weight is in the normal category. Keep up your healthy lifestyle."
            }
            SeverityTier::Underweight => {
                "Your weight is below normal. Make sure your nutritional intake is sufficient to support your health."
            }
        }
    }

    /// CSS modifier used by the dashboard card.
    pub fn css_class(self) -> &'static str {
        match self {
            SeverityTier::HighRisk => "tier-high-risk",
            SeverityTier::Caution => "tier-caution",
            SeverityTier::Healthy => "tier-healthy",
            SeverityTier::Underweight => "tier-underweight",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SeverityTier::HighRisk => "fa-solid fa-triangle-exclamation",
            SeverityTier::Caution => "fa-solid fa-circle-exclamation",
            SeverityTier::Healthy => "fa-solid fa-circle-check",
            SeverityTier::Underweight => "fa-solid fa-circle-info",
        }
    }
}

pub fn headline(label: ObesityLevel) -> String {
    format!("Predicted category: {}", label)
}
