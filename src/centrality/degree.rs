//! Degree centrality.

use super::NodeScores;
use crate::model::CoGraph;

/// Weighted degree: sum of incident edge weights.
pub fn degree(graph: &CoGraph) -> NodeScores<u64> {
    NodeScores::from_vec(
        graph
            .node_ids()
            .map(|id| graph.neighbors(id).iter().map(|(_, w)| *w).sum())
            .collect(),
    )
}

/// Number of distinct neighbours.
pub fn unweighted_degree(graph: &CoGraph) -> NodeScores<u64> {
    NodeScores::from_vec(graph.node_ids().map(|id| graph.neighbor_count(id) as u64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKey;

    #[test]
    fn test_single_edge_degree() {
        let a = NodeKey::hashtag("A");
        let b = NodeKey::hashtag("B");
        let graph = CoGraph::from_weighted_edges(vec![(a.clone(), b.clone(), 3)]);
        let deg = degree(&graph);
        assert_eq!(deg.get(graph.node_id(&a).unwrap()), Some(&3));
        assert_eq!(deg.get(graph.node_id(&b).unwrap()), Some(&3));
        assert_eq!(unweighted_degree(&graph).values(), &[1, 1]);
    }

    #[test]
    fn test_handshake() {
        let graph = CoGraph::from_weighted_edges(vec![
            (NodeKey::hashtag("a"), NodeKey::hashtag("b"), 2),
            (NodeKey::hashtag("b"), NodeKey::hashtag("c"), 7),
            (NodeKey::hashtag("c"), NodeKey::hashtag("a"), 1),
        ]);
        let total: u64 = degree(&graph).values().iter().sum();
        assert_eq!(total, 2 * graph.total_weight());
    }
}
