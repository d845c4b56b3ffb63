//! Inference against a loaded rainfall classifier.
//!
//! The classifier is schema-brittle: it reads columns by position and
//! produces a silently wrong probability when given them in another order.
//! Every call therefore checks the classifier's declared feature names
//! against [`FEATURE_SCHEMA`] before handing over the values.

use thiserror::Error;

use crate::services::features::{DerivedFeatureVector, FEATURE_SCHEMA};

/// The feature vector and the classifier disagree on shape or column order.
#[derive(Debug, Error, PartialEq)]
#[error("Inference schema mismatch: {0}")]
pub struct InferenceSchemaError(pub String);

/// A binary classifier exposing class probabilities.
pub trait RainfallClassifier: Send + Sync {
    /// Column names the classifier was trained on, in training order.
    fn feature_names(&self) -> &[String];

    /// `[prob_class0, prob_class1]` for a single sample.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceSchemaError>;
}

/// Probability of rainfall (class 1) for one derived feature vector.
pub fn predict_rainfall(
    classifier: &dyn RainfallClassifier,
    features: &DerivedFeatureVector,
) -> Result<f64, InferenceSchemaError> {
    if let Some(problem) = FEATURE_SCHEMA.mismatch(classifier.feature_names()) {
        return Err(InferenceSchemaError(problem));
    }

    tracing::debug!(
        "Scoring features {:?}",
        features.iter().collect::<Vec<_>>()
    );
    let [_, prob_class1] = classifier.predict_proba(&features.to_array())?;
    tracing::debug!("Predicted rainfall probability {:.4}", prob_class1);
    Ok(prob_class1)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::features::derive_features;
    use crate::services::inputs::RawWeatherRecord;

    /// Classifier returning a fixed probability, declaring the given columns.
    pub(crate) struct StubClassifier {
        pub(crate) names: Vec<String>,
        pub(crate) prob_class1: f64,
    }

    impl StubClassifier {
        pub(crate) fn new(prob_class1: f64) -> Self {
            Self {
                names: FEATURE_SCHEMA.names.iter().map(|n| n.to_string()).collect(),
                prob_class1,
            }
        }
    }

    impl RainfallClassifier for StubClassifier {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceSchemaError> {
            if features.len() != self.names.len() {
                return Err(InferenceSchemaError(format!(
                    "got {} values",
                    features.len()
                )));
            }
            Ok([1.0 - self.prob_class1, self.prob_class1])
        }
    }

    fn features() -> DerivedFeatureVector {
        derive_features(&RawWeatherRecord::default())
    }

    #[test]
    fn test_selects_class_one_probability() {
        let stub = StubClassifier::new(0.42);
        assert_eq!(predict_rainfall(&stub, &features()).unwrap(), 0.42);
    }

    #[test]
    fn test_reordered_classifier_rejected() {
        let mut stub = StubClassifier::new(0.42);
        stub.names.swap(3, 4);
        let err = predict_rainfall(&stub, &features()).unwrap_err();
        assert!(err.0.contains("column 3"));
        assert!(err.0.contains("dewpoint_maxtemp"));
    }

    #[test]
    fn test_wrong_feature_count_rejected() {
        let mut stub = StubClassifier::new(0.42);
        stub.names.pop();
        let err = predict_rainfall(&stub, &features()).unwrap_err();
        assert!(err.to_string().contains("expected 18 features"));
    }

    /// Output depends on specific column positions.
    struct PositionalClassifier {
        names: Vec<String>,
    }

    impl RainfallClassifier for PositionalClassifier {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], InferenceSchemaError> {
            // column 14 is week, column 1 is day
            let p = features[14] / features[1];
            Ok([1.0 - p, p])
        }
    }

    #[test]
    fn test_values_passed_in_schema_order() {
        let classifier = PositionalClassifier {
            names: FEATURE_SCHEMA.names.iter().map(|n| n.to_string()).collect(),
        };
        let raw = RawWeatherRecord {
            day: 14,
            ..RawWeatherRecord::default()
        };
        let p = predict_rainfall(&classifier, &derive_features(&raw)).unwrap();
        assert_eq!(p, 2.0 / 14.0);
    }
}
