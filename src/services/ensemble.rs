//! Tree-ensemble inference.
//!
//! Estimators are trained elsewhere (scikit-learn / XGBoost) and exported
//! as parallel node arrays in scikit-learn's layout. This module only
//! evaluates them:
//!
//! - [`RandomForest`]: leaves hold class-1 probabilities, averaged over trees
//! - [`GradientBoosting`]: leaves hold log-odds corrections, summed and
//!   passed through a sigmoid
//!
//! Structural checks happen once in `validate`, so traversal can index
//! nodes directly.

use serde::Deserialize;
use thiserror::Error;

/// Structural problems found while validating an exported tree.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("node arrays have inconsistent lengths")]
    LengthMismatch,
    #[error("node {node}: child index {child} does not point forward into the tree")]
    BadChild { node: usize, child: i64 },
    #[error("node {node}: split feature {feature} out of range for {n_features} features")]
    BadFeature {
        node: usize,
        feature: i64,
        n_features: usize,
    },
    #[error("node {node}: non-finite threshold or value")]
    NonFinite { node: usize },
    #[error("node {node}: leaf probability {value} outside [0, 1]")]
    BadProbability { node: usize, value: f64 },
}

/// A single binary decision tree in scikit-learn's array layout.
///
/// `feature[i] < 0` marks node `i` as a leaf. Samples with
/// `x[feature] <= threshold` go to `children_left`, others to
/// `children_right`.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    /// Check the node arrays so that [`DecisionTree::evaluate`] always
    /// terminates and never indexes out of bounds.
    ///
    /// Children must point strictly forward (scikit-learn numbers nodes in
    /// depth-first order), which rules out cycles.
    pub fn validate(&self, n_features: usize) -> Result<(), TreeError> {
        let n = self.feature.len();
        if n == 0 {
            return Err(TreeError::Empty);
        }
        if self.threshold.len() != n
            || self.children_left.len() != n
            || self.children_right.len() != n
            || self.value.len() != n
        {
            return Err(TreeError::LengthMismatch);
        }

        for node in 0..n {
            let feature = self.feature[node];
            if feature < 0 {
                if !self.value[node].is_finite() {
                    return Err(TreeError::NonFinite { node });
                }
                continue;
            }
            if feature as usize >= n_features {
                return Err(TreeError::BadFeature {
                    node,
                    feature,
                    n_features,
                });
            }
            if !self.threshold[node].is_finite() {
                return Err(TreeError::NonFinite { node });
            }
            for child in [self.children_left[node], self.children_right[node]] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(TreeError::BadChild { node, child });
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `features`.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let feature = self.feature[idx];
            if feature < 0 {
                return self.value[idx];
            }
            let x = features.get(feature as usize).copied().unwrap_or(0.0);
            idx = if x <= self.threshold[idx] {
                self.children_left[idx] as usize
            } else {
                self.children_right[idx] as usize
            };
        }
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.feature.len()
    }

    fn leaf_values(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.feature
            .iter()
            .zip(self.value.iter())
            .enumerate()
            .filter(|(_, (f, _))| **f < 0)
            .map(|(i, (_, v))| (i, *v))
    }
}

/// Random forest classifier: mean of per-tree class-1 probabilities.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self, n_features: usize) -> Result<(), TreeError> {
        for tree in &self.trees {
            tree.validate(n_features)?;
            if let Some((node, value)) = tree
                .leaf_values()
                .find(|(_, v)| !(0.0..=1.0).contains(v))
            {
                return Err(TreeError::BadProbability { node, value });
            }
        }
        Ok(())
    }

    /// Class-1 probability.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        total / self.trees.len() as f64
    }
}

/// Sigmoid for converting log-odds to probabilities.
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Gradient-boosted trees for binary classification.
#[derive(Debug, Clone, Deserialize)]
pub struct GradientBoosting {
    pub learning_rate: f64,
    /// Log-odds baseline before any tree contribution.
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<DecisionTree>,
}

impl GradientBoosting {
    pub fn validate(&self, n_features: usize) -> Result<(), TreeError> {
        self.trees.iter().try_for_each(|t| t.validate(n_features))
    }

    /// Raw log-odds score.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.trees
            .iter()
            .fold(self.base_score, |score, tree| {
                score + self.learning_rate * tree.evaluate(features)
            })
    }

    /// Class-1 probability.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.decision_function(features))
    }
}
