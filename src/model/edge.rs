//! Weighted undirected edge.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// An undirected co-occurrence edge, stored with `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: u64,
}

impl Edge {
    /// Canonical orientation: the smaller id becomes `source`.
    pub fn new(a: NodeId, b: NodeId, weight: u64) -> Self {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        Self { source, target, weight }
    }
}
