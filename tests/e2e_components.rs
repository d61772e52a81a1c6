//! End-to-end tests for the component analyzer and the per-graph report.

use discourse_graph::{
    analyze, connected_components, diameter, giant_component, project, AnalysisConfig, CoGraph,
    NodeId, NodeKey,
};

fn h(text: &str) -> NodeKey {
    NodeKey::hashtag(text)
}

fn graph(edges: &[(&str, &str, u64)]) -> CoGraph {
    CoGraph::from_weighted_edges(edges.iter().map(|(a, b, w)| (h(a), h(b), *w)))
}

#[test]
fn test_components_largest_first() {
    let g = graph(&[("x", "y", 1), ("a", "b", 1), ("b", "c", 1), ("c", "d", 1)]);
    let components = connected_components(&g);

    assert_eq!(components.len(), 2);
    assert_eq!(components[0].size, 4);
    assert_eq!(components[1].size, 2);

    let members: usize = components.iter().map(|c| c.size).sum();
    assert_eq!(members, g.node_count());
}

#[test]
fn test_giant_component_projection() {
    let g = graph(&[("x", "y", 7), ("a", "b", 2), ("b", "c", 3)]);
    let giant = giant_component(&g);

    assert_eq!(giant.node_count(), 3);
    assert_eq!(giant.edge_count(), 2);
    assert!(!giant.contains(&h("x")));
    assert_eq!(giant.weight_between(&h("b"), &h("c")), Some(3));
    assert_eq!(diameter(&giant), 2);
    // the source graph is untouched
    assert_eq!(g.node_count(), 5);
}

#[test]
fn test_project_keeps_induced_edges_only() {
    let g = graph(&[("a", "b", 1), ("b", "c", 1), ("c", "a", 1), ("c", "d", 1)]);
    let ids: Vec<_> = ["a", "b", "d"].iter().filter_map(|t| g.node_id(&h(t))).collect();
    let sub = project(&g, ids);

    assert_eq!(sub.node_count(), 3);
    assert_eq!(sub.edge_count(), 1);
    assert_eq!(sub.weight_between(&h("a"), &h("b")), Some(1));
}

#[test]
fn test_diameter_of_cycle() {
    let g = graph(&[
        ("a", "b", 1),
        ("b", "c", 1),
        ("c", "d", 1),
        ("d", "e", 1),
        ("e", "f", 1),
        ("f", "a", 1),
    ]);
    assert_eq!(diameter(&g), 3);
}

#[test]
fn test_diameter_degenerate_graphs() {
    assert_eq!(diameter(&CoGraph::empty()), 0);
    let single = project(&graph(&[("a", "b", 1)]), [NodeId(0)]);
    assert_eq!(single.node_count(), 1);
    assert_eq!(diameter(&single), 0);
}

#[test]
fn test_report_diameter_on_giant() {
    let g = graph(&[("a", "b", 1), ("b", "c", 1), ("c", "d", 1), ("x", "y", 1)]);
    let report = analyze(&g, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.node_count, 6);
    assert_eq!(report.components.len(), 2);
    assert_eq!(report.giant_size(), 4);
    assert_eq!(report.giant_diameter(), Some(3));
    assert_eq!(report.components[1].members, vec!["x".to_string(), "y".to_string()]);
}
