//! # Centrality Engine
//!
//! Weighted degree, weighted betweenness (Brandes) and weighted PageRank
//! over an immutable `CoGraph`. Results are `NodeScores`, indexed by the
//! `NodeId`s of the graph they were computed on.

pub mod degree;
pub mod betweenness;
pub mod pagerank;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{CoGraph, NodeId};

pub use degree::{degree, unweighted_degree};
pub use betweenness::betweenness;
pub use pagerank::{pagerank, PageRankParams, PageRankRun};

/// One value per node, indexed by `NodeId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeScores<T> {
    values: Vec<T>,
}

impl<T> NodeScores<T> {
    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.values.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.values.iter().enumerate().map(|(i, v)| (NodeId(i as u32), v))
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Re-key by node label (`NodeKey` display form), for export.
    pub fn by_label(&self, graph: &CoGraph) -> BTreeMap<String, T>
    where
        T: Clone,
    {
        self.iter().map(|(id, v)| (graph.key(id).to_string(), v.clone())).collect()
    }
}

impl NodeScores<f64> {
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}
