//! # Component Analyzer
//!
//! Connected components (largest first), hop diameter of a connected
//! graph, and induced-subgraph projection.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{CoGraph, GraphBuilder, NodeId, NodeKey};

/// A maximal connected set of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Member ids, ascending.
    pub members: Vec<NodeId>,
    pub size: usize,
}

impl Component {
    pub fn keys<'g>(&self, graph: &'g CoGraph) -> Vec<&'g NodeKey> {
        self.members.iter().map(|id| graph.key(*id)).collect()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.members.binary_search(&id).is_ok()
    }
}

/// Connected components ordered by descending size.
///
/// Ties keep discovery order, i.e. the component holding the smallest
/// node id comes first. The first entry is the giant component.
pub fn connected_components(graph: &CoGraph) -> Vec<Component> {
    let mut seen = vec![false; graph.node_count()];
    let mut components = Vec::new();

    for start in graph.node_ids() {
        if seen[start.index()] {
            continue;
        }
        seen[start.index()] = true;
        let mut members = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for (next, _) in graph.neighbors(node) {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    members.push(*next);
                    queue.push_back(*next);
                }
            }
        }
        members.sort_unstable();
        let size = members.len();
        components.push(Component { members, size });
    }

    components.sort_by(|a, b| b.size.cmp(&a.size));
    debug!(
        components = components.len(),
        giant = components.first().map_or(0, |c| c.size),
        "connected components"
    );
    components
}

/// Largest hop eccentricity over all nodes. Edge weights are ignored.
///
/// Meant for a connected graph such as the giant component. Graphs with
/// fewer than two nodes have diameter 0. On a disconnected graph the
/// largest finite eccentricity is returned and a warning is logged.
pub fn diameter(graph: &CoGraph) -> usize {
    let n = graph.node_count();
    if n < 2 {
        return 0;
    }

    let mut best = 0;
    let mut disconnected = false;
    let mut dist = vec![usize::MAX; n];
    let mut queue = VecDeque::new();

    for source in graph.node_ids() {
        dist.fill(usize::MAX);
        dist[source.index()] = 0;
        queue.push_back(source);
        let mut reached = 1;
        while let Some(node) = queue.pop_front() {
            let d = dist[node.index()];
            best = best.max(d);
            for (next, _) in graph.neighbors(node) {
                if dist[next.index()] == usize::MAX {
                    dist[next.index()] = d + 1;
                    reached += 1;
                    queue.push_back(*next);
                }
            }
        }
        disconnected |= reached < n;
    }

    if disconnected {
        warn!(nodes = n, "diameter requested on a disconnected graph; using largest finite eccentricity");
    }
    best
}

/// Induced subgraph on `subset`: only edges with both endpoints inside.
///
/// Returns a new graph with freshly issued ids (in the original id order);
/// the input graph is untouched. Ids not in `graph` are ignored.
pub fn project<I>(graph: &CoGraph, subset: I) -> CoGraph
where
    I: IntoIterator<Item = NodeId>,
{
    let mut keep = vec![false; graph.node_count()];
    for id in subset {
        if let Some(slot) = keep.get_mut(id.index()) {
            *slot = true;
        }
    }

    let mut builder = GraphBuilder::new();
    let mut remap = vec![None; graph.node_count()];
    for id in graph.node_ids().filter(|id| keep[id.index()]) {
        remap[id.index()] = Some(builder.add_node(graph.key(id).clone()));
    }
    for edge in graph.edges() {
        if let (Some(a), Some(b)) = (remap[edge.source.index()], remap[edge.target.index()]) {
            builder.add_weight(a, b, edge.weight);
        }
    }
    builder.build()
}

/// Projection onto the largest component; empty graph stays empty.
pub fn giant_component(graph: &CoGraph) -> CoGraph {
    match connected_components(graph).into_iter().next() {
        Some(giant) => project(graph, giant.members),
        None => CoGraph::empty(),
    }
}
