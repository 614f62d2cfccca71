//! Regime classifier backed by a decision-tree ensemble artifact.
//!
//! The artifact is a JSON document `{"trees":[{"nodes":[...]}, ...]}`
//! produced offline.  It is loaded and validated once at startup; a
//! missing or malformed artifact is a fatal startup error for the
//! controller.  Prediction is a majority vote, ties going to the lowest
//! class label.

pub mod tree;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::app::ports::Classifier;
use crate::error::ClassifierError;
use crate::telemetry::Features;

pub use tree::{DecisionTree, MAX_CLASS, Node};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionForest {
    pub trees: Vec<DecisionTree>,
}

impl DecisionForest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ClassifierError::ArtifactMissing(path.to_path_buf()),
            _ => ClassifierError::ArtifactInvalid(format!("{}: {e}", path.display())),
        })?;
        let forest = Self::from_json(&text)?;
        info!(
            "classifier loaded from {}: {} trees, {} nodes",
            path.display(),
            forest.trees.len(),
            forest.node_count()
        );
        Ok(forest)
    }

    pub fn from_json(text: &str) -> Result<Self, ClassifierError> {
        let forest: Self = serde_json::from_str(text)
            .map_err(|e| ClassifierError::ArtifactInvalid(e.to_string()))?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.trees.is_empty() {
            return Err(ClassifierError::ArtifactInvalid("forest has no trees".into()));
        }
        self.trees.iter().try_for_each(DecisionTree::validate)
    }

    pub fn node_count(&self) -> usize {
        self.trees.iter().map(|t| t.nodes.len()).sum()
    }
}

impl Classifier for DecisionForest {
    fn predict(&self, features: &Features) -> Result<u8, ClassifierError> {
        features.validate()?;
        let x = features.as_array();

        let mut votes = [0usize; MAX_CLASS as usize + 1];
        for tree in &self.trees {
            let class = tree.predict(&x)?;
            let slot = votes
                .get_mut(class as usize)
                .ok_or(ClassifierError::UnknownLabel(class))?;
            *slot += 1;
        }

        // max_by_key keeps the last maximum; iterate in reverse so ties
        // resolve to the lowest label.
        let winner = votes
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, n)| **n)
            .map(|(class, _)| class as u8)
            .unwrap_or(0);
        Ok(winner)
    }
}
