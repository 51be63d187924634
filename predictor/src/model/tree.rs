//! Regression tree ensembles (random forest / gradient boosting exports)
//!
//! Trees use the flat array layout common to tree exporters: node `i` splits
//! on `feature[i]` at `threshold[i]`, sending `x <= threshold` to
//! `children_left[i]` and the rest to `children_right[i]`. A node whose left
//! child is `-1` is a leaf holding `value[i]`.

use planting_shared::{FeatureVector, PlantingModel, PredictionError, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;

/// How tree outputs are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Random forest: average of tree outputs
    #[default]
    Mean,
    /// Boosting: learning-rate scaled sum of tree outputs
    Sum,
}

/// A single regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

/// An ensemble of regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub trees: Vec<RegressionTree>,
    #[serde(default)]
    pub base_prediction: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

fn default_learning_rate() -> f64 {
    1.0
}

impl RegressionTree {
    /// Walk from the root to a leaf
    fn evaluate(&self, tree: usize, features: &FeatureVector) -> Result<f64, PredictionError> {
        let malformed = |reason: String| PredictionError::MalformedTree { tree, reason };

        let nodes = self.value.len();
        if nodes == 0 {
            return Err(malformed("tree has no nodes".to_string()));
        }
        if [
            self.children_left.len(),
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
        ]
        .iter()
        .any(|len| *len != nodes)
        {
            return Err(malformed("node arrays have different lengths".to_string()));
        }

        let values = features.as_array();
        let mut node = 0usize;

        // A path through a well-formed tree never revisits a node
        for _ in 0..nodes {
            let left = self.children_left[node];
            if left == LEAF {
                return Ok(self.value[node]);
            }

            let feature = usize::try_from(self.feature[node])
                .ok()
                .filter(|f| *f < FEATURE_COUNT)
                .ok_or_else(|| {
                    malformed(format!(
                        "node {} splits on unknown feature {}",
                        node, self.feature[node]
                    ))
                })?;

            let next = if values[feature] <= self.threshold[node] {
                left
            } else {
                self.children_right[node]
            };

            node = usize::try_from(next)
                .ok()
                .filter(|n| *n < nodes)
                .ok_or_else(|| malformed(format!("node {} points to missing child {}", node, next)))?;
        }

        Err(malformed("path does not reach a leaf".to_string()))
    }
}

impl PlantingModel for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        if self.trees.is_empty() {
            return Err(PredictionError::EmptyEnsemble);
        }

        let mut total = 0.0;
        for (index, tree) in self.trees.iter().enumerate() {
            total += tree.evaluate(index, features)?;
        }

        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => self.learning_rate * total,
        };

        Ok(self.base_prediction + combined)
    }

    fn describe(&self) -> String {
        let kind = match self.aggregation {
            Aggregation::Mean => "random forest",
            Aggregation::Sum => "boosted trees",
        };
        format!("{} ({} trees)", kind, self.trees.len())
    }
}
