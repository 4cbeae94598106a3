//! Small artifact sets for tests.
//!
//! Both profiles share the same two trees: one splits on Weight
//! (scaled as `(w - 80) / 20`), the other on the male indicator.

use serde_json::{json, Value};
use shared::features::{Frequency, Gender, Transport, YesNo};
use shared::{Feature, FeatureRecord, Profile};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::aligner::{ColumnManifest, FeatureAligner, LabelEncodeAligner, OneHotAligner};
use super::encoder::{CategoricalEncoders, TargetEncoder};
use super::forest::RandomForest;
use super::scaler::Scaler;
use super::Pipeline;
use crate::artifacts::ArtifactError;
use crate::config::{ArtifactFiles, PipelineConfig, UnseenCategoryPolicy};

/// scikit-learn's sorted class order.
const CLASSES: [&str; 7] = [
    "Insufficient_Weight",
    "Normal_Weight",
    "Obesity_Type_I",
    "Obesity_Type_II",
    "Obesity_Type_III",
    "Overweight_Level_I",
    "Overweight_Level_II",
];

const ONE_HOT_COLUMNS: [&str; 22] = [
    "Age",
    "Height",
    "Weight",
    "FCVC",
    "NCP",
    "CH2O",
    "FAF",
    "TUE",
    "Gender_Male",
    "family_history_with_overweight_yes",
    "FAVC_yes",
    "CAEC_Frequently",
    "CAEC_Sometimes",
    "CAEC_no",
    "SMOKE_yes",
    "SCC_yes",
    "CALC_Sometimes",
    "CALC_no",
    "MTRANS_Bike",
    "MTRANS_Motorbike",
    "MTRANS_Public_Transportation",
    "MTRANS_Walking",
];

pub fn scenario_record() -> FeatureRecord {
    FeatureRecord {
        gender: Gender::Male,
        age: 25.0,
        height: 1.70,
        weight: 70.0,
        family_history_with_overweight: YesNo::Yes,
        favc: YesNo::Yes,
        fcvc: 2.0,
        ncp: 3.0,
        caec: Frequency::Sometimes,
        smoke: YesNo::No,
        ch2o: 2.0,
        scc: YesNo::No,
        faf: 1.0,
        tue: 1.0,
        calc: Frequency::No,
        mtrans: Transport::PublicTransportation,
    }
}

fn forest(n_features: usize, weight: usize, male: usize) -> Value {
    json!({
        "kind": "random_forest",
        "n_features": n_features,
        "n_classes": 7,
        "trees": [
            {
                "children_left": [1, -1, 3, -1, -1],
                "children_right": [2, -1, 4, -1, -1],
                "feature": [weight, -2, weight, -2, -2],
                "threshold": [-1.5, -2.0, 0.0, -2.0, -2.0],
                "value": [
                    [5.0, 8.0, 6.0, 0.0, 0.0, 2.0, 1.0],
                    [5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                    [0.0, 8.0, 6.0, 0.0, 0.0, 2.0, 1.0],
                    [0.0, 8.0, 0.0, 0.0, 0.0, 2.0, 0.0],
                    [0.0, 0.0, 6.0, 0.0, 0.0, 0.0, 1.0]
                ]
            },
            {
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [male, -2, -2],
                "threshold": [0.5, -2.0, -2.0],
                "value": [
                    [0.0, 4.0, 0.0, 0.0, 0.0, 2.0, 0.0],
                    [0.0, 3.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                    [0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
                ]
            }
        ]
    })
}

fn scaler(columns: &[&str], weight: usize) -> Value {
    let mut mean = vec![0.0; columns.len()];
    let mut scale = vec![1.0; columns.len()];
    mean[weight] = 80.0;
    scale[weight] = 20.0;
    json!({
        "kind": "standard",
        "feature_names_in": columns,
        "mean": mean,
        "scale": scale
    })
}

fn target() -> Value {
    json!({ "classes": CLASSES })
}

fn encoders() -> Value {
    // CALC never saw "Always" during training.
    json!({
        "Gender": ["Female", "Male"],
        "family_history_with_overweight": ["no", "yes"],
        "FAVC": ["no", "yes"],
        "CAEC": ["Always", "Frequently", "Sometimes", "no"],
        "SMOKE": ["no", "yes"],
        "SCC": ["no", "yes"],
        "CALC": ["Frequently", "Sometimes", "no"],
        "MTRANS": ["Automobile", "Bike", "Motorbike", "Public_Transportation", "Walking"]
    })
}

fn manifest() -> Value {
    json!({
        "columns": ONE_HOT_COLUMNS,
        "baseline": {
            "Gender": "Female",
            "family_history_with_overweight": "no",
            "FAVC": "no",
            "CAEC": "Always",
            "SMOKE": "no",
            "SCC": "no",
            "CALC": "Frequently",
            "MTRANS": "Automobile"
        }
    })
}

fn raw_columns() -> Vec<&'static str> {
    Feature::all().map(Feature::column).collect()
}

pub fn label_encode_files() -> Vec<(&'static str, Value)> {
    let columns = raw_columns();
    vec![
        ("model.json", forest(16, 3, 0)),
        ("scaler.json", scaler(&columns, 3)),
        ("categorical_encoders.json", encoders()),
        ("target_encoder.json", target()),
    ]
}

pub fn one_hot_files() -> Vec<(&'static str, Value)> {
    vec![
        ("model.json", forest(22, 2, 8)),
        ("scaler.json", scaler(&ONE_HOT_COLUMNS, 2)),
        ("columns.json", manifest()),
        ("target_encoder.json", target()),
    ]
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture artifact")
}

pub fn categorical_encoders() -> CategoricalEncoders {
    CategoricalEncoders::from_artifact(parse(encoders())).unwrap()
}

pub fn label_encode_aligner() -> LabelEncodeAligner {
    let columns = raw_columns().into_iter().map(str::to_string).collect();
    LabelEncodeAligner::new(columns, categorical_encoders())
}

pub fn one_hot_manifest() -> ColumnManifest {
    parse(manifest())
}

fn build(
    profile: Profile,
    model: Value,
    scaler: Value,
    aligner: impl FnOnce(Vec<String>) -> Box<dyn FeatureAligner>,
) -> Result<Pipeline, ArtifactError> {
    let scaler = Scaler::from_artifact(parse(scaler))?;
    let aligner = aligner(scaler.feature_names().to_vec());
    Pipeline::new(
        profile,
        aligner,
        scaler,
        RandomForest::from_artifact(parse(model))?,
        TargetEncoder::from_artifact(parse(target()))?,
        "fixture".to_string(),
    )
}

pub fn label_encode_pipeline() -> Pipeline {
    pipeline_with_model_width(16).unwrap()
}

pub fn pipeline_with_model_width(n_features: usize) -> Result<Pipeline, ArtifactError> {
    build(
        Profile::LabelEncode,
        forest(n_features, 3, 0),
        scaler(&raw_columns(), 3),
        |columns| -> Box<dyn FeatureAligner> {
            Box::new(LabelEncodeAligner::new(columns, categorical_encoders()))
        },
    )
}

/// Label-encode pipeline whose scaler was fitted on `columns`, while the
/// aligner still emits the raw feature order.
pub fn pipeline_with_scaler_columns(columns: &[&str]) -> Pipeline {
    build(
        Profile::LabelEncode,
        forest(columns.len(), 3, 0),
        scaler(columns, 3),
        |_| -> Box<dyn FeatureAligner> { Box::new(label_encode_aligner()) },
    )
    .unwrap()
}

pub fn one_hot_pipeline(policy: UnseenCategoryPolicy) -> Pipeline {
    build(
        Profile::OneHot,
        forest(22, 2, 8),
        scaler(&ONE_HOT_COLUMNS, 2),
        |columns| -> Box<dyn FeatureAligner> {
            Box::new(OneHotAligner::new(one_hot_manifest(), columns, policy).unwrap())
        },
    )
    .unwrap()
}

/// A throwaway artifact directory, removed on drop.
pub struct TempArtifacts {
    dir: PathBuf,
}

impl TempArtifacts {
    pub fn write(files: &[(&str, Value)]) -> Self {
        let dir = std::env::temp_dir().join(format!("obesity-api-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        for (name, value) in files {
            std::fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self, profile: Profile) -> PipelineConfig {
        PipelineConfig {
            profile,
            unseen_category: UnseenCategoryPolicy::Reject,
            artifact_dir: self.dir.clone(),
            files: ArtifactFiles::default(),
        }
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
