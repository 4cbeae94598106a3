use serde::{Deserialize, Serialize};

use crate::features::{choices, Feature, FeatureRecord, FeatureValue};

/// Input control for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum FieldDomain {
    Slider {
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Select {
        options: Vec<String>,
        default: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub feature: Feature,
    pub label: String,
    pub domain: FieldDomain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub groups: Vec<FieldGroup>,
}

impl FormSchema {
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.groups.iter().flat_map(|group| group.fields.iter())
    }
}

fn slider(min: f64, max: f64, step: f64, default: f64) -> FieldDomain {
    FieldDomain::Slider {
        min,
        max,
        step,
        default,
    }
}

/// The widget domain of a feature. Defaults match [`FeatureRecord::default`].
pub fn domain(feature: Feature) -> FieldDomain {
    match feature {
        Feature::Age => slider(1.0, 100.0, 1.0, 25.0),
        Feature::Height => slider(1.0, 2.2, 0.01, 1.70),
        Feature::Weight => slider(30.0, 200.0, 1.0, 70.0),
        Feature::Faf => slider(0.0, 3.0, 0.01, 1.0),
        Feature::Tue => slider(0.0, 2.0, 0.01, 1.0),
        Feature::Fcvc => slider(1.0, 3.0, 0.01, 2.0),
        Feature::Ncp => slider(1.0, 4.0, 0.01, 3.0),
        Feature::Ch2o => slider(1.0, 4.0, 0.01, 2.0),
        categorical => {
            let default = match FeatureRecord::default().value(categorical) {
                FeatureValue::Categorical(value) => value.to_string(),
                FeatureValue::Numeric(value) => value.to_string(),
            };
            FieldDomain::Select {
                options: choices(categorical)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                default,
            }
        }
    }
}

pub fn label(feature: Feature) -> &'static str {
    match feature {
        Feature::Gender => "Gender",
        Feature::Age => "Age (years)",
        Feature::Height => "Height (m)",
        Feature::Weight => "Weight (kg)",
        Feature::FamilyHistoryWithOverweight => "Family history of overweight",
        Feature::Favc => "Frequently eats high-calorie food (FAVC)",
        Feature::Fcvc => "Vegetable consumption frequency (FCVC)",
        Feature::Ncp => "Main meals per day (NCP)",
        Feature::Caec => "Eats between meals (CAEC)",
        Feature::Smoke => "Do you smoke? (SMOKE)",
        Feature::Ch2o => "Water intake per day, litres (CH2O)",
        Feature::Scc => "Do you monitor calorie intake? (SCC)",
        Feature::Faf => "Physical activity frequency per week (FAF)",
        Feature::Tue => "Daily device usage, hours (TUE)",
        Feature::Calc => "Alcohol consumption (CALC)",
        Feature::Mtrans => "Main mode of transport (MTRANS)",
    }
}

fn group(title: &str, features: &[Feature]) -> FieldGroup {
    FieldGroup {
        title: title.to_string(),
        fields: features
            .iter()
            .map(|&feature| FieldSpec {
                feature,
                label: label(feature).to_string(),
                domain: domain(feature),
            })
            .collect(),
    }
}

/// The dashboard form: personal data and activity on the left, eating
/// habits on the right.
pub fn form_schema() -> FormSchema {
    FormSchema {
        groups: vec![
            group(
                "Personal & physical data",
                &[Feature::Age, Feature::Gender, Feature::Height, Feature::Weight],
            ),
            group(
                "Activity & other habits",
                &[Feature::Smoke, Feature::Faf, Feature::Tue, Feature::Mtrans],
            ),
            group(
                "Eating habits & lifestyle",
                &[
                    Feature::FamilyHistoryWithOverweight,
                    Feature::Favc,
                    Feature::Scc,
                    Feature::Fcvc,
                    Feature::Ncp,
                    Feature::Caec,
                    Feature::Ch2o,
                    Feature::Calc,
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn schema_covers_every_feature_once() {
        let schema = form_schema();
        let seen: Vec<Feature> = schema.fields().map(|field| field.feature).collect();
        let unique: HashSet<Feature> = seen.iter().copied().collect();
        assert_eq!(seen.len(), 16);
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn controls_match_feature_kind() {
        for field in form_schema().fields() {
            match &field.domain {
                FieldDomain::Slider { min, max, default, .. } => {
                    assert!(!field.feature.is_categorical());
                    assert!(min <= default && default <= max, "{}", field.feature);
                }
                FieldDomain::Select { options, default } => {
                    assert!(field.feature.is_categorical());
                    assert!(options.contains(default), "{}", field.feature);
                }
            }
        }
    }

    #[test]
    fn slider_defaults_agree_with_default_record() {
        let record = FeatureRecord::default();
        for feature in Feature::all() {
            if let FieldDomain::Slider { default, .. } = domain(feature) {
                assert_eq!(record.value(feature), FeatureValue::Numeric(default));
            }
        }
    }

    #[test]
    fn domain_serializes_with_control_tag() {
        let json = serde_json::to_value(domain(Feature::Age)).unwrap();
        assert_eq!(json["control"], "slider");
        assert_eq!(json["max"], 100.0);

        let json = serde_json::to_value(domain(Feature::Gender)).unwrap();
        assert_eq!(json["control"], "select");
        assert_eq!(json["default"], "Male");
    }
}
