//! Tree ensemble inference over fitted node arrays.
//!
//! A tree is stored the way scikit-learn keeps `tree_`: parallel arrays
//! indexed by node id, `-1` children marking leaves, and a per-node class
//! weight vector. The forest probability is the mean of every tree's
//! normalized leaf weights.

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use crate::artifacts::ArtifactError;
use crate::error::PredictionError;

const LEAF: i64 = -1;

#[derive(Debug, Clone, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest {
        n_features: usize,
        n_classes: usize,
        trees: Vec<TreeArtifact>,
    },
    DecisionTree {
        n_features: usize,
        n_classes: usize,
        tree: TreeArtifact,
    },
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn from_artifact(
        tree: TreeArtifact,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, ArtifactError> {
        let invalid = |msg: String| ArtifactError::Invalid(format!("tree: {}", msg));
        let n = tree.children_left.len();
        if n == 0 {
            return Err(invalid("no nodes".into()));
        }
        if [
            tree.children_right.len(),
            tree.feature.len(),
            tree.threshold.len(),
            tree.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(invalid("node arrays differ in length".into()));
        }

        let mut nodes = Vec::with_capacity(n);
        for id in 0..n {
            let (left, right) = (tree.children_left[id], tree.children_right[id]);
            if left == LEAF && right == LEAF {
                let weights = &tree.value[id];
                if weights.len() != n_classes {
                    return Err(invalid(format!(
                        "leaf {} has {} class weights, expected {}",
                        id,
                        weights.len(),
                        n_classes
                    )));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(invalid(format!("leaf {} has invalid weights", id)));
                }
                let total: f64 = weights.iter().sum();
                if total <= 0.0 {
                    return Err(invalid(format!("leaf {} has no weight", id)));
                }
                nodes.push(Node::Leaf {
                    distribution: weights.iter().map(|w| w / total).collect(),
                });
                continue;
            }

            // Children always come after their parent, so walks terminate.
            let child = |c: i64| -> Result<usize, ArtifactError> {
                if c <= id as i64 || c >= n as i64 {
                    Err(invalid(format!("node {} has bad child {}", id, c)))
                } else {
                    Ok(c as usize)
                }
            };
            let feature = tree.feature[id];
            if feature < 0 || feature as usize >= n_features {
                return Err(invalid(format!(
                    "node {} splits on feature {} of {}",
                    id, feature, n_features
                )));
            }
            let threshold = tree.threshold[id];
            if !threshold.is_finite() {
                return Err(invalid(format!("node {} has non-finite threshold", id)));
            }
            nodes.push(Node::Split {
                feature: feature as usize,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }
        Ok(Self { nodes })
    }

    fn leaf(&self, x: ArrayView1<'_, f64>) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Trees were fitted on single-precision inputs.
                    let value = x[*feature] as f32 as f64;
                    id = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ArtifactError> {
        let (n_features, n_classes, trees) = match artifact {
            ModelArtifact::RandomForest {
                n_features,
                n_classes,
                trees,
            } => (n_features, n_classes, trees),
            ModelArtifact::DecisionTree {
                n_features,
                n_classes,
                tree,
            } => (n_features, n_classes, vec![tree]),
        };
        if trees.is_empty() {
            return Err(ArtifactError::Invalid("model has no trees".into()));
        }
        if n_classes == 0 || n_features == 0 {
            return Err(ArtifactError::Invalid(
                "model needs at least one feature and one class".into(),
            ));
        }
        let trees = trees
            .into_iter()
            .map(|tree| DecisionTree::from_artifact(tree, n_features, n_classes))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn predict_proba(&self, x: ArrayView1<'_, f64>) -> Result<Array1<f64>, PredictionError> {
        if x.len() != self.n_features {
            return Err(PredictionError::InferenceFailure(format!(
                "model expects {} features, got {}",
                self.n_features,
                x.len()
            )));
        }
        let mut proba = Array1::<f64>::zeros(self.n_classes);
        for tree in &self.trees {
            proba += &ArrayView1::from(tree.leaf(x));
        }
        proba /= self.trees.len() as f64;
        Ok(proba)
    }

    /// Most probable class index and the full distribution. Ties go to the
    /// lowest index.
    pub fn predict(&self, x: ArrayView1<'_, f64>) -> Result<(usize, Array1<f64>), PredictionError> {
        let proba = self.predict_proba(x)?;
        let mut best = 0;
        for (i, &p) in proba.iter().enumerate() {
            if p > proba[best] {
                best = i;
            }
        }
        Ok((best, proba))
    }
}
