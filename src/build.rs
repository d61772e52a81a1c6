//! # Graph Builder
//!
//! Entity table → weighted co-occurrence graph.
//!
//! Every entity becomes a node under the chosen identity. For each
//! document, every unordered pair of distinct occurrences (different
//! `entity_index`) adds 1 to the weight of the edge between their keys.
//! Pairs whose keys collapse to the same node would be self-loops and are
//! dropped. Unordered pairs are counted once, so `weight(u, v)` is the
//! number of occurrence pairs of `u` and `v` across the corpus.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{
    split_by_year, CoGraph, Document, EntityRow, EntityTable, GraphBuilder, NodeIdentity, NodeKey,
};

/// Build the co-occurrence graph for `table` under `identity`.
pub fn build_graph(table: &EntityTable, identity: NodeIdentity) -> CoGraph {
    build_graph_by(table, |row| identity.key(row))
}

/// Build the co-occurrence graph with an arbitrary row → key mapping.
pub fn build_graph_by<F>(table: &EntityTable, key_of: F) -> CoGraph
where
    F: Fn(&EntityRow) -> NodeKey,
{
    let mut builder = GraphBuilder::new();

    for (_, rows) in table.documents() {
        let occurrences: Vec<_> = rows
            .iter()
            .map(|row| (row.entity_index, builder.add_node(key_of(row))))
            .collect();

        for (i, (index_a, node_a)) in occurrences.iter().enumerate() {
            for (index_b, node_b) in &occurrences[i + 1..] {
                if index_a != index_b {
                    builder.add_weight(*node_a, *node_b, 1);
                }
            }
        }
    }

    let graph = builder.build();
    debug!(
        documents = table.document_count(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "co-occurrence graph built"
    );
    graph
}

/// One graph per calendar year of `documents`.
///
/// Entity rows whose document has no date are left out.
pub fn build_period_graphs(
    table: &EntityTable,
    documents: &[Document],
    identity: NodeIdentity,
) -> BTreeMap<i32, CoGraph> {
    split_by_year(documents)
        .into_iter()
        .map(|(year, ids)| (year, build_graph(&table.restrict_to(&ids), identity)))
        .collect()
}

/// A distinct node key with its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub index: usize,
    pub key: NodeKey,
    pub count: usize,
}

/// Distinct keys ranked by descending occurrence count, ties by key.
pub fn vocabulary(table: &EntityTable, identity: NodeIdentity) -> Vec<VocabularyEntry> {
    let mut counts: HashMap<NodeKey, usize> = HashMap::new();
    for row in table.rows() {
        *counts.entry(identity.key(row)).or_insert(0) += 1;
    }

    let mut ranked: Vec<(NodeKey, usize)> = counts.into_iter().collect();
    ranked.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (key, count))| VocabularyEntry { index, key, count })
        .collect()
}
