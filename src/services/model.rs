//! Rainfall classifier artifact.
//!
//! The classifier is a soft-voting ensemble of tree models exported to JSON.
//! The artifact names the feature schema it was trained on; loading fails
//! unless that schema is exactly [`FEATURE_SCHEMA`], so a retrained model
//! with different columns is caught at startup rather than producing wrong
//! probabilities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use utoipa::ToSchema;

use crate::services::ensemble::{DecisionTree, GradientBoosting, RandomForest, TreeError};
use crate::services::features::{FEATURE_COUNT, FEATURE_SCHEMA};
use crate::services::inference::{InferenceSchemaError, RainfallClassifier};

/// Errors that can occur while loading the model artifact.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("IO error reading model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("Model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Model artifact schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Invalid estimator {index}: {source}")]
    InvalidTree { index: usize, source: TreeError },
    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

/// One member of the voting ensemble.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    RandomForest {
        weight: f64,
        #[serde(flatten)]
        model: RandomForest,
    },
    GradientBoosting {
        weight: f64,
        #[serde(flatten)]
        model: GradientBoosting,
    },
}

impl Estimator {
    fn weight(&self) -> f64 {
        match self {
            Estimator::RandomForest { weight, .. } | Estimator::GradientBoosting { weight, .. } => {
                *weight
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Estimator::RandomForest { .. } => "random_forest",
            Estimator::GradientBoosting { .. } => "gradient_boosting",
        }
    }

    fn trees(&self) -> usize {
        match self {
            Estimator::RandomForest { model, .. } => model.trees.len(),
            Estimator::GradientBoosting { model, .. } => model.trees.len(),
        }
    }

    fn nodes(&self) -> usize {
        match self {
            Estimator::RandomForest { model, .. } => {
                model.trees.iter().map(DecisionTree::n_nodes).sum()
            }
            Estimator::GradientBoosting { model, .. } => {
                model.trees.iter().map(DecisionTree::n_nodes).sum()
            }
        }
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        match self {
            Estimator::RandomForest { model, .. } => model.predict_proba(features),
            Estimator::GradientBoosting { model, .. } => model.predict_proba(features),
        }
    }
}

/// Model artifact as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,
    pub schema_version: String,
    pub feature_names: Vec<String>,
    pub estimators: Vec<Estimator>,
}

impl ModelArtifact {
    /// Check schema compatibility and ensemble structure.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        if self.schema_version != FEATURE_SCHEMA.version {
            return Err(ModelLoadError::SchemaMismatch(format!(
                "artifact schema version '{}', expected '{}'",
                self.schema_version, FEATURE_SCHEMA.version
            )));
        }
        if let Some(problem) = FEATURE_SCHEMA.mismatch(self.feature_names.as_slice()) {
            return Err(ModelLoadError::SchemaMismatch(problem));
        }
        if self.estimators.is_empty() {
            return Err(ModelLoadError::Invalid("no estimators".to_string()));
        }

        for (index, estimator) in self.estimators.iter().enumerate() {
            let weight = estimator.weight();
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ModelLoadError::Invalid(format!(
                    "estimator {} has non-positive weight {}",
                    index, weight
                )));
            }
            if estimator.trees() == 0 {
                return Err(ModelLoadError::Invalid(format!(
                    "estimator {} has no trees",
                    index
                )));
            }
            let checked = match estimator {
                Estimator::RandomForest { model, .. } => model.validate(FEATURE_COUNT),
                Estimator::GradientBoosting { model, .. } => {
                    if !model.learning_rate.is_finite() || model.learning_rate <= 0.0 {
                        return Err(ModelLoadError::Invalid(format!(
                            "estimator {} has non-positive learning rate {}",
                            index, model.learning_rate
                        )));
                    }
                    if !model.base_score.is_finite() {
                        return Err(ModelLoadError::Invalid(format!(
                            "estimator {} has non-finite base score",
                            index
                        )));
                    }
                    model.validate(FEATURE_COUNT)
                }
            };
            checked.map_err(|source| ModelLoadError::InvalidTree { index, source })?;
        }
        Ok(())
    }
}

/// Summary of one ensemble member, for the model metadata endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EstimatorSummary {
    /// "random_forest" or "gradient_boosting"
    pub kind: String,
    /// Soft-voting weight
    pub weight: f64,
    /// Number of trees
    pub trees: usize,
    /// Total node count across the trees
    pub nodes: usize,
}

/// Metadata about the loaded classifier.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelInfo {
    /// Model name from the artifact
    pub name: String,
    /// Model version from the artifact
    pub version: String,
    /// Feature schema version the model was trained with
    pub schema_version: String,
    /// Feature names in the order the model consumes them
    pub feature_names: Vec<String>,
    /// Ensemble members
    pub estimators: Vec<EstimatorSummary>,
    /// When the artifact was loaded into this process
    pub loaded_at: DateTime<Utc>,
}

/// A validated soft-voting ensemble ready for inference.
#[derive(Debug, Clone)]
pub struct EnsembleModel {
    artifact: ModelArtifact,
    total_weight: f64,
    loaded_at: DateTime<Utc>,
}

impl EnsembleModel {
    /// Validate an artifact and wrap it for inference.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelLoadError> {
        artifact.validate()?;
        let total_weight = artifact.estimators.iter().map(Estimator::weight).sum();
        Ok(Self {
            artifact,
            total_weight,
            loaded_at: Utc::now(),
        })
    }

    /// Parse and validate an artifact from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// Class-1 probability: weighted mean of the members' probabilities.
    pub fn probability(&self, features: &[f64]) -> f64 {
        let weighted: f64 = self
            .artifact
            .estimators
            .iter()
            .map(|e| e.weight() * e.predict_proba(features))
            .sum();
        weighted / self.total_weight
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.artifact.name.clone(),
            version: self.artifact.version.clone(),
            schema_version: self.artifact.schema_version.clone(),
            feature_names: self.artifact.feature_names.clone(),
            estimators: self
                .artifact
                .estimators
                .iter()
                .map(|e| EstimatorSummary {
                    kind: e.kind().to_string(),
                    weight: e.weight(),
                    trees: e.trees(),
                    nodes: e.nodes(),
                })
                .collect(),
            loaded_at: self.loaded_at,
        }
    }
}

impl RainfallClassifier for EnsembleModel {
    fn feature_names(&self) -> &[String] {
        &self.artifact.feature_names
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceSchemaError> {
        if features.len() != self.artifact.feature_names.len() {
            return Err(InferenceSchemaError(format!(
                "model expects {} values, got {}",
                self.artifact.feature_names.len(),
                features.len()
            )));
        }
        let p = self.probability(features);
        Ok([1.0 - p, p])
    }
}

/// Load and validate the model artifact at `path`.
pub fn load_model(path: &Path) -> Result<EnsembleModel, ModelLoadError> {
    let json = std::fs::read_to_string(path)?;
    let model = EnsembleModel::from_json(&json)?;
    tracing::info!(
        "Loaded model '{}' v{} ({} estimators) from {}",
        model.artifact.name,
        model.artifact.version,
        model.artifact.estimators.len(),
        path.display()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::features::derive_features;
    use crate::services::inference::predict_rainfall;
    use crate::services::inputs::RawWeatherRecord;
    use serde_json::json;

    fn names() -> Vec<String> {
        FEATURE_SCHEMA.names.iter().map(|n| n.to_string()).collect()
    }

    /// Forest splits on humidity (column 6), boosting on sunshine (column 11).
    fn artifact_json() -> serde_json::Value {
        json!({
            "name": "test_model",
            "version": "0.0.1",
            "schema_version": "rainfall-features/v1",
            "feature_names": names(),
            "estimators": [
                {
                    "type": "random_forest",
                    "weight": 1.0,
                    "trees": [{
                        "feature": [6, -2, -2],
                        "threshold": [70.0, -2.0, -2.0],
                        "children_left": [1, -1, -1],
                        "children_right": [2, -1, -1],
                        "value": [0.0, 0.2, 0.9]
                    }]
                },
                {
                    "type": "gradient_boosting",
                    "weight": 3.0,
                    "learning_rate": 1.0,
                    "base_score": 0.0,
                    "trees": [{
                        "feature": [11, -2, -2],
                        "threshold": [5.0, -2.0, -2.0],
                        "children_left": [1, -1, -1],
                        "children_right": [2, -1, -1],
                        "value": [0.0, 2.0, -2.0]
                    }]
                }
            ]
        })
    }

    fn load(value: serde_json::Value) -> Result<EnsembleModel, ModelLoadError> {
        EnsembleModel::from_json(&value.to_string())
    }

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    #[test]
    fn test_loads_valid_artifact() {
        let model = load(artifact_json()).unwrap();
        let info = model.info();
        assert_eq!(info.name, "test_model");
        assert_eq!(info.estimators.len(), 2);
        assert_eq!(info.estimators[0].kind, "random_forest");
        assert_eq!(info.estimators[1].kind, "gradient_boosting");
        assert_eq!(info.estimators[1].trees, 1);
        assert_eq!(info.estimators[1].nodes, 3);
        assert_eq!(info.feature_names, names());
    }

    #[test]
    fn test_soft_voting_weighted_mean() {
        let model = load(artifact_json()).unwrap();
        let mut x = [0.0; FEATURE_COUNT];
        x[6] = 80.0; // humid → forest 0.9
        x[11] = 2.0; // little sunshine → boosting sigmoid(2)
        let expected = (1.0 * 0.9 + 3.0 * sigmoid(2.0)) / 4.0;
        assert!((model.probability(&x) - expected).abs() < 1e-12);

        let [p0, p1] = model.predict_proba(&x).unwrap();
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        assert!((p1 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_predict_proba_rejects_wrong_length() {
        let model = load(artifact_json()).unwrap();
        let err = model.predict_proba(&[0.0; 17]).unwrap_err();
        assert!(err.0.contains("expects 18"));
    }

    #[test]
    fn test_reordered_feature_names_fail_to_load() {
        let mut value = artifact_json();
        let mut swapped = names();
        swapped.swap(12, 13);
        value["feature_names"] = json!(swapped);
        let err = load(value).unwrap_err();
        assert!(matches!(err, ModelLoadError::SchemaMismatch(_)));
        assert!(err.to_string().contains("column 12"));
    }

    #[test]
    fn test_schema_version_mismatch_fails_to_load() {
        let mut value = artifact_json();
        value["schema_version"] = json!("rainfall-features/v2");
        assert!(matches!(
            load(value),
            Err(ModelLoadError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_no_estimators_fails_to_load() {
        let mut value = artifact_json();
        value["estimators"] = json!([]);
        assert!(matches!(load(value), Err(ModelLoadError::Invalid(_))));
    }

    #[test]
    fn test_zero_weight_fails_to_load() {
        let mut value = artifact_json();
        value["estimators"][0]["weight"] = json!(0.0);
        assert!(matches!(load(value), Err(ModelLoadError::Invalid(_))));
    }

    #[test]
    fn test_broken_tree_reports_estimator_index() {
        let mut value = artifact_json();
        value["estimators"][1]["trees"][0]["children_left"] = json!([0, -1, -1]);
        match load(value) {
            Err(ModelLoadError::InvalidTree { index, source }) => {
                assert_eq!(index, 1);
                assert_eq!(source, TreeError::BadChild { node: 0, child: 0 });
            }
            other => panic!("expected InvalidTree, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_estimator_type_is_json_error() {
        let mut value = artifact_json();
        value["estimators"][0]["type"] = json!("svm");
        assert!(matches!(load(value), Err(ModelLoadError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_model(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ModelLoadError::Io(_)));
    }

    #[test]
    fn test_bundled_artifact_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/rainfall_classifier_v1.json");
        let model = load_model(&path).unwrap();
        assert_eq!(model.info().schema_version, FEATURE_SCHEMA.version);

        let features = derive_features(&RawWeatherRecord::default());
        let p = predict_rainfall(&model, &features).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_bundled_artifact_ranks_wet_above_dry() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/rainfall_classifier_v1.json");
        let model = load_model(&path).unwrap();

        let wet = RawWeatherRecord {
            cloud: 95,
            humidity: 95,
            sunshine: 0.0,
            dewpoint: 19.0,
            temperature: 20.0,
            maxtemp: 21.0,
            mintemp: 18.0,
            ..RawWeatherRecord::default()
        };
        let dry = RawWeatherRecord {
            cloud: 5,
            humidity: 40,
            sunshine: 12.0,
            dewpoint: 5.0,
            temperature: 25.0,
            maxtemp: 32.0,
            mintemp: 14.0,
            ..RawWeatherRecord::default()
        };
        let p_wet = predict_rainfall(&model, &derive_features(&wet)).unwrap();
        let p_dry = predict_rainfall(&model, &derive_features(&dry)).unwrap();
        assert!(p_wet > 0.8, "wet probability {}", p_wet);
        assert!(p_dry <= 0.5, "dry probability {}", p_dry);
    }
}
