use serde::Deserialize;
use shared::ObesityLevel;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::artifacts::ArtifactError;
use crate::error::PredictionError;

/// Column name → classes, as saved by the training run.
pub type CategoricalEncodersArtifact = BTreeMap<String, Vec<String>>;

/// Fitted string → integer mapping for one categorical column. A value's
/// code is its position in the class list.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    column: String,
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(column: String, classes: Vec<String>) -> Result<Self, ArtifactError> {
        if classes.is_empty() {
            return Err(ArtifactError::Invalid(format!(
                "encoder for {} has no classes",
                column
            )));
        }
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.into_iter().enumerate() {
            if codes.insert(class.clone(), code).is_some() {
                return Err(ArtifactError::Invalid(format!(
                    "encoder for {} lists '{}' twice",
                    column, class
                )));
            }
        }
        Ok(Self { column, codes })
    }

    pub fn encode(&self, value: &str) -> Result<f64, PredictionError> {
        self.codes
            .get(value)
            .map(|&code| code as f64)
            .ok_or_else(|| PredictionError::UnseenCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoders {
    by_column: HashMap<String, LabelEncoder>,
}

impl CategoricalEncoders {
    pub fn from_artifact(artifact: CategoricalEncodersArtifact) -> Result<Self, ArtifactError> {
        let by_column = artifact
            .into_iter()
            .map(|(column, classes)| {
                LabelEncoder::new(column.clone(), classes).map(|encoder| (column, encoder))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { by_column })
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.by_column.get(column)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetEncoderArtifact {
    pub classes: Vec<String>,
}

/// Decodes the model's class index into an obesity level.
#[derive(Debug, Clone)]
pub struct TargetEncoder {
    classes: Vec<ObesityLevel>,
}

impl TargetEncoder {
    pub fn from_artifact(artifact: TargetEncoderArtifact) -> Result<Self, ArtifactError> {
        let classes = artifact
            .classes
            .iter()
            .map(|name| {
                ObesityLevel::from_class(name).ok_or_else(|| {
                    ArtifactError::Invalid(format!("unknown target class '{}'", name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let unique: HashSet<ObesityLevel> = classes.iter().copied().collect();
        if classes.is_empty() || unique.len() != classes.len() {
            return Err(ArtifactError::Invalid(
                "target encoder classes must be non-empty and distinct".into(),
            ));
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[ObesityLevel] {
        &self.classes
    }

    pub fn decode(&self, index: usize) -> Result<ObesityLevel, PredictionError> {
        self.classes.get(index).copied().ok_or_else(|| {
            PredictionError::InferenceFailure(format!(
                "class index {} has no label ({} known)",
                index,
                self.classes.len()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn codes_follow_class_order() {
        let encoder =
            LabelEncoder::new("CAEC".into(), classes(&["Always", "Frequently", "Sometimes", "no"]))
                .unwrap();
        assert_eq!(encoder.encode("Always").unwrap(), 0.0);
        assert_eq!(encoder.encode("no").unwrap(), 3.0);
    }

    #[test]
    fn unseen_value_is_an_error() {
        let encoder = LabelEncoder::new("CALC".into(), classes(&["Frequently", "no"])).unwrap();
        match encoder.encode("Always") {
            Err(PredictionError::UnseenCategory { column, value }) => {
                assert_eq!(column, "CALC");
                assert_eq!(value, "Always");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duplicate_classes_are_rejected() {
        let artifact: CategoricalEncodersArtifact =
            [("SMOKE".to_string(), classes(&["no", "no"]))].into_iter().collect();
        assert!(CategoricalEncoders::from_artifact(artifact).is_err());
    }

    #[test]
    fn target_decoding() {
        let target = TargetEncoder::from_artifact(TargetEncoderArtifact {
            classes: classes(&["Insufficient_Weight", "Normal_Weight", "Obesity_Type_I"]),
        })
        .unwrap();
        assert_eq!(target.decode(2).unwrap(), ObesityLevel::ObesityTypeI);
        assert!(matches!(
            target.decode(3),
            Err(PredictionError::InferenceFailure(_))
        ));
    }

    #[test]
    fn target_rejects_labels_outside_the_closed_set() {
        let err = TargetEncoder::from_artifact(TargetEncoderArtifact {
            classes: classes(&["Normal_Weight", "Morbid"]),
        })
        .unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }
}
