//! End-to-end tests for the graph builder: entity rows in, weighted
//! co-occurrence graph out, then straight into the component analyzer.

use discourse_graph::{
    build_graph, build_period_graphs, connected_components, diameter, Document, EntityRow,
    EntityTable, NodeIdentity, NodeKey,
};
use discourse_graph::model::parse_twitter_date;

fn table(rows: &[(&str, u32, &str, &str)]) -> EntityTable {
    rows.iter()
        .map(|(doc, idx, text, tag)| EntityRow::new(*doc, *idx, *text, *tag))
        .collect()
}

// ============================================================================
// 1. Two documents sharing one word
// ============================================================================

#[test]
fn test_climate_change_strike() {
    let graph = build_graph(
        &table(&[
            ("d1", 0, "climate", "N"),
            ("d1", 1, "change", "N"),
            ("d2", 0, "climate", "N"),
            ("d2", 1, "strike", "N"),
        ]),
        NodeIdentity::WordSense,
    );

    let climate = NodeKey::word("climate", "N");
    let change = NodeKey::word("change", "N");
    let strike = NodeKey::word("strike", "N");

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.weight_between(&climate, &change), Some(1));
    assert_eq!(graph.weight_between(&climate, &strike), Some(1));
    assert_eq!(graph.weight_between(&change, &strike), None);

    let components = connected_components(&graph);
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].size, 3);
    assert_eq!(diameter(&graph), 2);
}

// ============================================================================
// 2. Weights accumulate across documents
// ============================================================================

#[test]
fn test_pair_in_three_documents_has_weight_three() {
    let rows: Vec<_> = (1..=3)
        .flat_map(|d| {
            let doc = format!("d{d}");
            vec![EntityRow::new(doc.clone(), 0, "A", "N"), EntityRow::new(doc, 1, "B", "N")]
        })
        .collect();
    let graph = build_graph(&rows.into_iter().collect(), NodeIdentity::WordSense);

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.total_weight(), 3);
    let edge = graph.edges().next().unwrap();
    assert_eq!(edge.weight, 3);
}

// ============================================================================
// 3. Node identity
// ============================================================================

#[test]
fn test_identity_changes_node_set() {
    let rows = table(&[
        ("d1", 0, "strike", "N"),
        ("d1", 1, "school", "N"),
        ("d2", 0, "strike", "V"),
        ("d2", 1, "school", "N"),
    ]);

    let by_sense = build_graph(&rows, NodeIdentity::WordSense);
    assert_eq!(by_sense.node_count(), 3);
    assert_eq!(by_sense.edge_count(), 2);

    let by_text = build_graph(&rows, NodeIdentity::Hashtag);
    assert_eq!(by_text.node_count(), 2);
    assert_eq!(
        by_text.weight_between(&NodeKey::hashtag("strike"), &NodeKey::hashtag("school")),
        Some(2)
    );
}

#[test]
fn test_isolated_documents_keep_their_nodes() {
    let graph = build_graph(
        &table(&[("d1", 0, "a", "N"), ("d1", 1, "b", "N"), ("d2", 0, "lonely", "N")]),
        NodeIdentity::WordSense,
    );
    assert_eq!(graph.node_count(), 3);
    let components = connected_components(&graph);
    assert_eq!(components.iter().map(|c| c.size).collect::<Vec<_>>(), vec![2, 1]);
}

// ============================================================================
// 4. Yearly periods
// ============================================================================

#[test]
fn test_period_graphs_follow_utc_year() {
    // 01:30 at +0200 on Jan 1st is still 2018 in UTC
    let docs = vec![
        Document::new("d1", parse_twitter_date("Tue Jan 01 01:30:00 +0200 2019").unwrap()),
        Document::new("d2", parse_twitter_date("Wed Jan 02 12:00:00 +0000 2019").unwrap()),
    ];
    let graphs = build_period_graphs(
        &table(&[
            ("d1", 0, "a", "N"),
            ("d1", 1, "b", "N"),
            ("d2", 0, "c", "N"),
            ("d2", 1, "d", "N"),
        ]),
        &docs,
        NodeIdentity::WordSense,
    );

    assert_eq!(graphs.len(), 2);
    assert!(graphs[&2018].contains(&NodeKey::word("a", "N")));
    assert!(graphs[&2019].contains(&NodeKey::word("d", "N")));
    assert_eq!(graphs[&2019].node_count(), 2);
}
