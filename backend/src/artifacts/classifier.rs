//! Crop classifiers decoded from artifact documents
//!
//! - Linear: `argmax_c (w_c · x + b_c)`, ties go to the first class
//! - Forest: majority vote of decision trees, ties go to the lowest class index

use ndarray::{Array1, Array2, ArrayView1};

use super::error::PipelineError;
use super::format::{NodeSpec, TreeSpec};
use shared::{CropLabel, FEATURE_COUNT};

/// Linear classifier - one weight row per class
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<CropLabel>,
    coefficients: Array2<f64>,
    intercepts: Array1<f64>,
}

impl LinearClassifier {
    pub fn new(
        classes: Vec<CropLabel>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("classes must not be empty".to_string());
        }
        if coefficients.len() != classes.len() || intercepts.len() != classes.len() {
            return Err(format!(
                "expected {} coefficient rows and intercepts, got {} and {}",
                classes.len(),
                coefficients.len(),
                intercepts.len()
            ));
        }
        if let Some(row) = coefficients.iter().find(|row| row.len() != FEATURE_COUNT) {
            return Err(format!(
                "coefficient row has {} entries, expected {}",
                row.len(),
                FEATURE_COUNT
            ));
        }

        let flat: Vec<f64> = coefficients.into_iter().flatten().collect();
        if flat.iter().chain(&intercepts).any(|v| !v.is_finite()) {
            return Err("weights contain a non-finite value".to_string());
        }
        let coefficients = Array2::from_shape_vec((classes.len(), FEATURE_COUNT), flat)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            classes,
            coefficients,
            intercepts: Array1::from(intercepts),
        })
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> Result<CropLabel, PipelineError> {
        let scores = self.coefficients.dot(&row) + &self.intercepts;
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(PipelineError::NonFinite {
                stage: "classifier",
            });
        }

        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        Ok(self.classes[best])
    }
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
        class_index: usize,
    },
}

/// A single decision tree with node 0 as root
#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Children must point forward so every walk terminates
    fn from_spec(spec: TreeSpec, n_classes: usize) -> Result<Self, String> {
        if spec.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let len = spec.nodes.len();
        let mut nodes = Vec::with_capacity(len);

        for (index, node) in spec.nodes.into_iter().enumerate() {
            match node {
                NodeSpec::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(format!("node {} splits on unknown feature {}", index, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", index));
                    }
                    for child in [left, right] {
                        if child <= index || child >= len {
                            return Err(format!(
                                "node {} has invalid child index {}",
                                index, child
                            ));
                        }
                    }
                    nodes.push(Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    });
                }
                NodeSpec::Leaf { class_index } => {
                    if class_index >= n_classes {
                        return Err(format!(
                            "leaf {} references class index {} of {}",
                            index, class_index, n_classes
                        ));
                    }
                    nodes.push(Node::Leaf { class_index });
                }
            }
        }

        Ok(Self { nodes })
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> usize {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { class_index } => return *class_index,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Forest classifier - majority vote over trees
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    classes: Vec<CropLabel>,
    trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    pub fn new(classes: Vec<CropLabel>, trees: Vec<TreeSpec>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("classes must not be empty".to_string());
        }
        if trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        let n_classes = classes.len();
        let trees = trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| DecisionTree::from_spec(t, n_classes).map_err(|e| format!("tree {}: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { classes, trees })
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> CropLabel {
        let mut votes = vec![0usize; self.classes.len()];
        for tree in &self.trees {
            votes[tree.predict_row(row)] += 1;
        }

        let mut best = 0;
        for (i, count) in votes.iter().enumerate() {
            if *count > votes[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

/// Unified classifier that can be either Linear or Forest
#[derive(Debug, Clone)]
pub enum Classifier {
    Linear(LinearClassifier),
    Forest(ForestClassifier),
}

impl Classifier {
    /// Predict one label per row
    pub fn predict(&self, batch: &Array2<f64>) -> Result<Vec<CropLabel>, PipelineError> {
        if batch.ncols() != FEATURE_COUNT {
            return Err(PipelineError::DimensionMismatch {
                stage: "classifier",
                expected: FEATURE_COUNT,
                found: batch.ncols(),
            });
        }

        batch
            .rows()
            .into_iter()
            .map(|row| match self {
                Classifier::Linear(model) => model.predict_row(row),
                Classifier::Forest(model) => Ok(model.predict_row(row)),
            })
            .collect()
    }

    pub fn classes(&self) -> &[CropLabel] {
        match self {
            Classifier::Linear(model) => &model.classes,
            Classifier::Forest(model) => &model.classes,
        }
    }
}
