//! Weighted undirected simple graph over entity keys.
//!
//! `CoGraph` is immutable once built. All derived structures (projections,
//! components, metrics) are new values; nothing mutates a graph in place.
//! Mutation only happens through `GraphBuilder`, which merges parallel
//! edges by summing weights and drops self-loops.

use hashbrown::HashMap;

use super::{Edge, NodeId, NodeKey};

// ============================================================================
// CoGraph
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoGraph {
    keys: Vec<NodeKey>,
    index: HashMap<NodeKey, NodeId>,
    /// node → neighbours with edge weight, sorted by neighbour id
    adjacency: Vec<Vec<(NodeId, u64)>>,
    edge_count: usize,
}

impl CoGraph {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a graph straight from weighted key pairs.
    pub fn from_weighted_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeKey, NodeKey, u64)>,
    {
        let mut builder = GraphBuilder::new();
        for (a, b, weight) in edges {
            let a = builder.add_node(a);
            let b = builder.add_node(b);
            builder.add_weight(a, b, weight);
        }
        builder.build()
    }

    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, id: NodeId) -> &NodeKey {
        &self.keys[id.index()]
    }

    pub fn node_id(&self, key: &NodeKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.keys.len() as u32).map(NodeId)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeKey)> {
        self.keys.iter().enumerate().map(|(i, key)| (NodeId(i as u32), key))
    }

    /// Neighbours of `id` with the connecting edge weight.
    pub fn neighbors(&self, id: NodeId) -> &[(NodeId, u64)] {
        &self.adjacency[id.index()]
    }

    /// Number of distinct neighbours (unweighted degree).
    pub fn neighbor_count(&self, id: NodeId) -> usize {
        self.adjacency[id.index()].len()
    }

    pub fn weight(&self, a: NodeId, b: NodeId) -> Option<u64> {
        let row = self.adjacency.get(a.index())?;
        row.binary_search_by_key(&b, |(n, _)| *n).ok().map(|pos| row[pos].1)
    }

    pub fn weight_between(&self, a: &NodeKey, b: &NodeKey) -> Option<u64> {
        self.weight(self.node_id(a)?, self.node_id(b)?)
    }

    /// Every edge exactly once, with `source < target`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, row)| {
            let source = NodeId(i as u32);
            row.iter()
                .filter(move |(target, _)| source < *target)
                .map(move |(target, weight)| Edge::new(source, *target, *weight))
        })
    }

    pub fn total_weight(&self) -> u64 {
        self.edges().map(|e| e.weight).sum()
    }
}

// ============================================================================
// GraphBuilder
// ============================================================================

/// Accumulates nodes and edge weights, then freezes into a `CoGraph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    keys: Vec<NodeKey>,
    index: HashMap<NodeKey, NodeId>,
    adjacency: Vec<HashMap<NodeId, u64>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key` if unseen; ids are issued in first-appearance order.
    pub fn add_node(&mut self, key: NodeKey) -> NodeId {
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = NodeId(self.keys.len() as u32);
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        self.adjacency.push(HashMap::new());
        id
    }

    /// Add `weight` to the undirected edge `a`–`b`. Self-loops are ignored.
    pub fn add_weight(&mut self, a: NodeId, b: NodeId, weight: u64) {
        if a == b || weight == 0 {
            return;
        }
        *self.adjacency[a.index()].entry(b).or_insert(0) += weight;
        *self.adjacency[b.index()].entry(a).or_insert(0) += weight;
    }

    pub fn build(self) -> CoGraph {
        let mut edge_count = 0;
        let adjacency = self
            .adjacency
            .into_iter()
            .map(|row| {
                let mut row: Vec<(NodeId, u64)> = row.into_iter().collect();
                row.sort_unstable_by_key(|(n, _)| *n);
                edge_count += row.len();
                row
            })
            .collect();
        CoGraph {
            keys: self.keys,
            index: self.index,
            adjacency,
            edge_count: edge_count / 2,
        }
    }
}
