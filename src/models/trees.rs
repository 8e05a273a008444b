//! Gradient-boosted tree ensemble (binary logistic objective).
//!
//! Each tree is a flat node list rooted at index 0. Split nodes send a row
//! left when `x[feature] < threshold`; non-finite inputs follow `default_left`.
//! The ensemble margin is `logit(base_score) + Σ leaf`, mapped through the
//! sigmoid.
//!
//! Children must have a larger index than their parent. This is how the
//! exporter lays trees out, and it guarantees traversal terminates.

use serde::{Deserialize, Serialize};

use crate::math::{logit, sigmoid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_left")]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

fn default_left() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, width: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= width {
                        return Err(format!(
                            "node {idx} splits on column {feature} but rows have {width} columns"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx} has a non-finite split threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("node {idx} has a non-finite leaf value"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `row`.
    pub fn evaluate(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = row[*feature];
                    let go_left = if x.is_finite() { x < *threshold } else { *default_left };
                    idx = if go_left { *left } else { *right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Prior probability the margin starts from.
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self, width: usize) -> Result<(), String> {
        if !(self.base_score.is_finite() && self.base_score > 0.0 && self.base_score < 1.0) {
            return Err(format!("base_score {} must lie strictly inside (0, 1)", self.base_score));
        }
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(width).map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    pub fn margin(&self, row: &[f64]) -> f64 {
        logit(self.base_score) + self.trees.iter().map(|t| t.evaluate(row)).sum::<f64>()
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        sigmoid(self.margin(row))
    }
}
