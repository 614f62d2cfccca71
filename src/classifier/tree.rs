//! Single decision tree in array representation.
//!
//! Node `0` is the root.  A split sends the sample left when
//! `x[feature] <= threshold`, right otherwise.

use serde::Deserialize;

use crate::error::ClassifierError;
use crate::telemetry::Features;

/// Highest class label the controller understands.
pub const MAX_CLASS: u8 = 2;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Structural checks run once at load time.
    ///
    /// Children must point strictly forward and stay in range, so every
    /// traversal terminates in at most `nodes.len()` steps.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.nodes.is_empty() {
            return Err(ClassifierError::ArtifactInvalid("tree has no nodes".into()));
        }
        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= Features::COUNT {
                        return Err(ClassifierError::ArtifactInvalid(format!(
                            "node {i}: feature index {feature} out of range"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ClassifierError::ArtifactInvalid(format!(
                            "node {i}: non-finite threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= i || child >= len {
                            return Err(ClassifierError::ArtifactInvalid(format!(
                                "node {i}: child {child} not in ({i}, {len})"
                            )));
                        }
                    }
                }
                Node::Leaf { class } => {
                    if class > MAX_CLASS {
                        return Err(ClassifierError::ArtifactInvalid(format!(
                            "node {i}: class {class} > {MAX_CLASS}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.  Assumes [`validate`](Self::validate)
    /// passed.
    pub fn predict(&self, x: &[f32; Features::COUNT]) -> Result<u8, ClassifierError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { class }) => return Ok(*class),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = x
                        .get(*feature)
                        .ok_or_else(|| ClassifierError::ArtifactInvalid("feature index".into()))?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ClassifierError::ArtifactInvalid(format!(
                        "dangling node index {index}"
                    )));
                }
            }
        }
    }
}
