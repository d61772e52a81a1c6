//! Document ↔ marker bipartite graph and its adjacency matrix.

use std::collections::VecDeque;
use std::fmt;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::DenseMatrix;
use crate::config::AffinityConfig;
use crate::model::EntityTable;
use crate::Diagnostic;

/// A node on either side of the bipartite graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum BipartiteNode {
    Marker(String),
    Document(String),
}

impl BipartiteNode {
    pub fn id(&self) -> &str {
        match self {
            BipartiteNode::Marker(id) | BipartiteNode::Document(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BipartiteNode::Marker(_) => "marker",
            BipartiteNode::Document(_) => "document",
        }
    }
}

impl fmt::Display for BipartiteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Community label of one marker, optionally scoped to a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityAssignment {
    #[serde(alias = "hashtag")]
    pub marker: String,
    pub community: String,
    #[serde(default)]
    pub year: Option<i32>,
}

impl CommunityAssignment {
    pub fn new(marker: impl Into<String>, community: impl Into<String>) -> Self {
        Self { marker: marker.into(), community: community.into(), year: None }
    }

    pub fn in_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// Normalize a marker the way the config asks (lower-casing).
pub fn normalize_marker(marker: &str, config: &AffinityConfig) -> String {
    if config.lowercase_markers { marker.to_lowercase() } else { marker.to_string() }
}

/// `(document, marker)` pairs for every entity row whose marker is
/// labeled by some community and is not an excluded seed marker.
pub fn bipartite_edges(
    markers: &EntityTable,
    communities: &[CommunityAssignment],
    config: &AffinityConfig,
) -> Vec<(String, String)> {
    let excluded: HashSet<String> =
        config.excluded_markers.iter().map(|m| normalize_marker(m, config)).collect();
    let labeled: HashSet<String> =
        communities.iter().map(|c| normalize_marker(&c.marker, config)).collect();

    let mut dropped = 0usize;
    let edges: Vec<(String, String)> = markers
        .rows()
        .filter_map(|row| {
            let marker = normalize_marker(&row.entity_text, config);
            if excluded.contains(&marker) || !labeled.contains(&marker) {
                dropped += 1;
                return None;
            }
            Some((row.document_id.clone(), marker))
        })
        .collect();

    debug!(edges = edges.len(), dropped, "bipartite edges selected");
    edges
}

/// Adjacency matrix of the bipartite graph, with its node order.
#[derive(Debug, Clone, PartialEq)]
pub struct BipartiteAdjacency {
    matrix: DenseMatrix,
    nodes: Vec<BipartiteNode>,
    index: HashMap<BipartiteNode, usize>,
    components: usize,
}

impl BipartiteAdjacency {
    /// Symmetric 0/1 adjacency, rows and columns in `nodes()` order.
    pub fn matrix(&self) -> &DenseMatrix {
        &self.matrix
    }

    pub fn nodes(&self) -> &[BipartiteNode] {
        &self.nodes
    }

    pub fn node_index(&self, node: &BipartiteNode) -> Option<usize> {
        self.index.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn component_count(&self) -> usize {
        self.components
    }

    pub fn diagnostic(&self) -> Option<Diagnostic> {
        (self.components > 1).then_some(Diagnostic::DisconnectedGraph { components: self.components })
    }
}

/// Build the symmetric 0/1 adjacency matrix from `(document, marker)` pairs.
///
/// Node order: distinct markers in first-appearance order, then distinct
/// documents in first-appearance order. Repeated pairs collapse to one
/// edge. A disconnected result is allowed but logged.
pub fn build_adjacency(edges: &[(String, String)]) -> BipartiteAdjacency {
    let mut nodes: Vec<BipartiteNode> = Vec::new();
    let mut index: HashMap<BipartiteNode, usize> = HashMap::new();

    let markers = edges.iter().map(|(_, m)| BipartiteNode::Marker(m.clone()));
    let documents = edges.iter().map(|(d, _)| BipartiteNode::Document(d.clone()));
    for node in markers.chain(documents) {
        if !index.contains_key(&node) {
            index.insert(node.clone(), nodes.len());
            nodes.push(node);
        }
    }

    let n = nodes.len();
    let mut matrix = DenseMatrix::zeros(n);
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (document, marker) in edges {
        let d = index[&BipartiteNode::Document(document.clone())];
        let m = index[&BipartiteNode::Marker(marker.clone())];
        if matrix.get(d, m) == 0.0 {
            matrix.set(d, m, 1.0);
            matrix.set(m, d, 1.0);
            neighbors[d].push(m);
            neighbors[m].push(d);
        }
    }

    let components = count_components(&neighbors);
    if components > 1 {
        warn!(components, nodes = n, "bipartite graph is not connected");
    }

    BipartiteAdjacency { matrix, nodes, index, components }
}

fn count_components(neighbors: &[Vec<usize>]) -> usize {
    let mut seen = vec![false; neighbors.len()];
    let mut count = 0;
    let mut queue = VecDeque::new();
    for start in 0..neighbors.len() {
        if seen[start] {
            continue;
        }
        count += 1;
        seen[start] = true;
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            for &w in &neighbors[v] {
                if !seen[w] {
                    seen[w] = true;
                    queue.push_back(w);
                }
            }
        }
    }
    count
}
