use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::form::{self, FieldDomain};

/// The 16 raw attributes, in the column order of the training dataset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
    IntoStaticStr,
)]
pub enum Feature {
    Gender,
    Age,
    Height,
    Weight,
    #[serde(rename = "family_history_with_overweight")]
    #[strum(serialize = "family_history_with_overweight")]
    FamilyHistoryWithOverweight,
    #[serde(rename = "FAVC")]
    #[strum(serialize = "FAVC")]
    Favc,
    #[serde(rename = "FCVC")]
    #[strum(serialize = "FCVC")]
    Fcvc,
    #[serde(rename = "NCP")]
    #[strum(serialize = "NCP")]
    Ncp,
    #[serde(rename = "CAEC")]
    #[strum(serialize = "CAEC")]
    Caec,
    #[serde(rename = "SMOKE")]
    #[strum(serialize = "SMOKE")]
    Smoke,
    #[serde(rename = "CH2O")]
    #[strum(serialize = "CH2O")]
    Ch2o,
    #[serde(rename = "SCC")]
    #[strum(serialize = "SCC")]
    Scc,
    #[serde(rename = "FAF")]
    #[strum(serialize = "FAF")]
    Faf,
    #[serde(rename = "TUE")]
    #[strum(serialize = "TUE")]
    Tue,
    #[serde(rename = "CALC")]
    #[strum(serialize = "CALC")]
    Calc,
    #[serde(rename = "MTRANS")]
    #[strum(serialize = "MTRANS")]
    Mtrans,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

impl Feature {
    pub fn all() -> impl Iterator<Item = Feature> {
        Feature::iter()
    }

    /// Column name used by the training data and every artifact.
    pub fn column(self) -> &'static str {
        self.into()
    }

    pub fn kind(self) -> FeatureKind {
        match self {
            Feature::Age
            | Feature::Height
            | Feature::Weight
            | Feature::Fcvc
            | Feature::Ncp
            | Feature::Ch2o
            | Feature::Faf
            | Feature::Tue => FeatureKind::Numeric,
            _ => FeatureKind::Categorical,
        }
    }

    pub fn is_categorical(self) -> bool {
        self.kind() == FeatureKind::Categorical
    }

    /// Looks a feature up by its column name.
    pub fn from_column(name: &str) -> Option<Feature> {
        Feature::from_str(name).ok()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
    IntoStaticStr,
)]
pub enum Gender {
    Male,
    Female,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
    IntoStaticStr,
)]
pub enum YesNo {
    #[serde(rename = "yes")]
    #[strum(serialize = "yes")]
    Yes,
    #[serde(rename = "no")]
    #[strum(serialize = "no")]
    No,
}

/// Answer scale shared by CAEC (snacking) and CALC (alcohol).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
    IntoStaticStr,
)]
pub enum Frequency {
    #[serde(rename = "no")]
    #[strum(serialize = "no")]
    No,
    Sometimes,
    Frequently,
    Always,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
    IntoStaticStr,
)]
pub enum Transport {
    Automobile,
    Motorbike,
    Bike,
    #[serde(rename = "Public_Transportation")]
    #[strum(serialize = "Public_Transportation")]
    PublicTransportation,
    Walking,
}

/// Uniform view over one cell of a [`FeatureRecord`].
#[derive(Debug, Clone, Copy, PartialEq, derive_more::From)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(&'static str),
}

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum RecordError {
    #[display(fmt = "{} must be between {} and {}, got {}", feature, min, max, value)]
    OutOfRange {
        feature: Feature,
        value: f64,
        min: f64,
        max: f64,
    },
    #[display(fmt = "{} must be a finite number", feature)]
    NotFinite { feature: Feature },
    #[display(fmt = "'{}' is not a valid choice for {}", value, feature)]
    UnknownChoice { feature: Feature, value: String },
    #[display(fmt = "{} does not accept this kind of value", feature)]
    WrongKind { feature: Feature },
}

/// One row of user input. Every field is required on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureRecord {
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Height")]
    pub height: f64,
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "family_history_with_overweight")]
    pub family_history_with_overweight: YesNo,
    #[serde(rename = "FAVC")]
    pub favc: YesNo,
    #[serde(rename = "FCVC")]
    pub fcvc: f64,
    #[serde(rename = "NCP")]
    pub ncp: f64,
    #[serde(rename = "CAEC")]
    pub caec: Frequency,
    #[serde(rename = "SMOKE")]
    pub smoke: YesNo,
    #[serde(rename = "CH2O")]
    pub ch2o: f64,
    #[serde(rename = "SCC")]
    pub scc: YesNo,
    #[serde(rename = "FAF")]
    pub faf: f64,
    #[serde(rename = "TUE")]
    pub tue: f64,
    #[serde(rename = "CALC")]
    pub calc: Frequency,
    #[serde(rename = "MTRANS")]
    pub mtrans: Transport,
}

impl Default for FeatureRecord {
    /// The values the form starts with.
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age: 25.0,
            height: 1.70,
            weight: 70.0,
            family_history_with_overweight: YesNo::Yes,
            favc: YesNo::Yes,
            fcvc: 2.0,
            ncp: 3.0,
            caec: Frequency::No,
            smoke: YesNo::Yes,
            ch2o: 2.0,
            scc: YesNo::Yes,
            faf: 1.0,
            tue: 1.0,
            calc: Frequency::No,
            mtrans: Transport::Automobile,
        }
    }
}

impl FeatureRecord {
    pub fn value(&self, feature: Feature) -> FeatureValue {
        match feature {
            Feature::Gender => FeatureValue::Categorical(self.gender.into()),
            Feature::Age => self.age.into(),
            Feature::Height => self.height.into(),
            Feature::Weight => self.weight.into(),
            Feature::FamilyHistoryWithOverweight => {
                FeatureValue::Categorical(self.family_history_with_overweight.into())
            }
            Feature::Favc => FeatureValue::Categorical(self.favc.into()),
            Feature::Fcvc => self.fcvc.into(),
            Feature::Ncp => self.ncp.into(),
            Feature::Caec => FeatureValue::Categorical(self.caec.into()),
            Feature::Smoke => FeatureValue::Categorical(self.smoke.into()),
            Feature::Ch2o => self.ch2o.into(),
            Feature::Scc => FeatureValue::Categorical(self.scc.into()),
            Feature::Faf => self.faf.into(),
            Feature::Tue => self.tue.into(),
            Feature::Calc => FeatureValue::Categorical(self.calc.into()),
            Feature::Mtrans => FeatureValue::Categorical(self.mtrans.into()),
        }
    }

    pub fn set_numeric(&mut self, feature: Feature, value: f64) -> Result<(), RecordError> {
        let slot = match feature {
            Feature::Age => &mut self.age,
            Feature::Height => &mut self.height,
            Feature::Weight => &mut self.weight,
            Feature::Fcvc => &mut self.fcvc,
            Feature::Ncp => &mut self.ncp,
            Feature::Ch2o => &mut self.ch2o,
            Feature::Faf => &mut self.faf,
            Feature::Tue => &mut self.tue,
            _ => return Err(RecordError::WrongKind { feature }),
        };
        *slot = value;
        Ok(())
    }

    pub fn set_choice(&mut self, feature: Feature, value: &str) -> Result<(), RecordError> {
        let unknown = || RecordError::UnknownChoice {
            feature,
            value: value.to_string(),
        };
        match feature {
            Feature::Gender => self.gender = value.parse().map_err(|_| unknown())?,
            Feature::FamilyHistoryWithOverweight => {
                self.family_history_with_overweight = value.parse().map_err(|_| unknown())?
            }
            Feature::Favc => self.favc = value.parse().map_err(|_| unknown())?,
            Feature::Caec => self.caec = value.parse().map_err(|_| unknown())?,
            Feature::Smoke => self.smoke = value.parse().map_err(|_| unknown())?,
            Feature::Scc => self.scc = value.parse().map_err(|_| unknown())?,
            Feature::Calc => self.calc = value.parse().map_err(|_| unknown())?,
            Feature::Mtrans => self.mtrans = value.parse().map_err(|_| unknown())?,
            _ => return Err(RecordError::WrongKind { feature }),
        }
        Ok(())
    }

    /// Checks every numeric field against its slider domain.
    pub fn validate(&self) -> Result<(), RecordError> {
        for feature in Feature::all() {
            let FeatureValue::Numeric(value) = self.value(feature) else {
                continue;
            };
            if !value.is_finite() {
                return Err(RecordError::NotFinite { feature });
            }
            if let FieldDomain::Slider { min, max, .. } = form::domain(feature) {
                if value < min || value > max {
                    return Err(RecordError::OutOfRange {
                        feature,
                        value,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Choices a categorical feature accepts, in form order.
pub fn choices(feature: Feature) -> Vec<&'static str> {
    fn names<E: IntoEnumIterator + Into<&'static str>>() -> Vec<&'static str> {
        E::iter().map(Into::into).collect()
    }
    match feature {
        Feature::Gender => names::<Gender>(),
        Feature::FamilyHistoryWithOverweight | Feature::Favc | Feature::Smoke | Feature::Scc => {
            names::<YesNo>()
        }
        Feature::Caec | Feature::Calc => names::<Frequency>(),
        Feature::Mtrans => names::<Transport>(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_training_order() {
        let columns: Vec<&str> = Feature::all().map(Feature::column).collect();
        assert_eq!(
            columns,
            vec![
                "Gender",
                "Age",
                "Height",
                "Weight",
                "family_history_with_overweight",
                "FAVC",
                "FCVC",
                "NCP",
                "CAEC",
                "SMOKE",
                "CH2O",
                "SCC",
                "FAF",
                "TUE",
                "CALC",
                "MTRANS",
            ]
        );
        assert_eq!(Feature::from_column("CH2O"), Some(Feature::Ch2o));
        assert_eq!(Feature::from_column("ch2o"), None);
    }

    #[test]
    fn eight_numeric_and_eight_categorical() {
        let numeric = Feature::all().filter(|f| !f.is_categorical()).count();
        assert_eq!(numeric, 8);
        assert_eq!(Feature::all().count(), 16);
    }

    #[test]
    fn record_deserializes_from_training_names() {
        let json = r#"{
            "Gender": "Female", "Age": 31, "Height": 1.62, "Weight": 58,
            "family_history_with_overweight": "no", "FAVC": "yes", "FCVC": 2.5,
            "NCP": 3, "CAEC": "Sometimes", "SMOKE": "no", "CH2O": 2,
            "SCC": "no", "FAF": 1.5, "TUE": 0.5, "CALC": "Frequently",
            "MTRANS": "Public_Transportation"
        }"#;
        let record: FeatureRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.mtrans, Transport::PublicTransportation);
        assert_eq!(
            record.value(Feature::Mtrans),
            FeatureValue::Categorical("Public_Transportation")
        );
        assert_eq!(record.value(Feature::Faf), FeatureValue::Numeric(1.5));
    }

    #[test]
    fn record_missing_a_feature_is_rejected() {
        let mut value = serde_json::to_value(FeatureRecord::default()).unwrap();
        value.as_object_mut().unwrap().remove("SCC");
        assert!(serde_json::from_value::<FeatureRecord>(value).is_err());
    }

    #[test]
    fn validate_checks_slider_bounds() {
        let mut record = FeatureRecord::default();
        assert!(record.validate().is_ok());

        record.age = 101.0;
        assert!(matches!(
            record.validate(),
            Err(RecordError::OutOfRange {
                feature: Feature::Age,
                ..
            })
        ));

        record.age = 100.0;
        record.height = f64::NAN;
        assert_eq!(
            record.validate(),
            Err(RecordError::NotFinite {
                feature: Feature::Height
            })
        );
    }

    #[test]
    fn setters_respect_feature_kind() {
        let mut record = FeatureRecord::default();
        record.set_numeric(Feature::Weight, 82.0).unwrap();
        record.set_choice(Feature::Caec, "Always").unwrap();
        assert_eq!(record.weight, 82.0);
        assert_eq!(record.caec, Frequency::Always);

        assert_eq!(
            record.set_numeric(Feature::Gender, 1.0),
            Err(RecordError::WrongKind {
                feature: Feature::Gender
            })
        );
        assert!(matches!(
            record.set_choice(Feature::Mtrans, "Rocket"),
            Err(RecordError::UnknownChoice { .. })
        ));
    }

    #[test]
    fn choices_use_wire_spelling() {
        assert_eq!(choices(Feature::Smoke), vec!["yes", "no"]);
        assert_eq!(
            choices(Feature::Calc),
            vec!["no", "Sometimes", "Frequently", "Always"]
        );
        assert!(choices(Feature::Age).is_empty());
    }
}
