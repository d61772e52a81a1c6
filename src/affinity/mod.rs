//! # Community-Affinity Scorer
//!
//! Scores every node of the document ↔ marker bipartite graph against
//! each marker community with a cluster-biased Google matrix:
//!
//! ```text
//! entity rows + community labels
//!   → bipartite_edges() → build_adjacency()
//!   → per cluster: google_matrix() → power_iterate()
//!   → AffinityTable (node × cluster)
//! ```
//!
//! Clusters are independent. With the `parallel` feature and
//! `AffinityConfig::parallel` they are scored on the rayon pool; cluster
//! `i` always draws its start vector from `seed + i`, so the result does
//! not depend on scheduling. A cluster that fails leaves a gap column.

pub mod matrix;
pub mod bipartite;
pub mod google;
pub mod power;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AffinityConfig;
use crate::model::{Document, EntityTable, split_by_year};
use crate::report::MetricOutcome;
use crate::{Diagnostic, Error, Result};

pub use matrix::DenseMatrix;
pub use bipartite::{
    build_adjacency, bipartite_edges, normalize_marker, BipartiteAdjacency, BipartiteNode,
    CommunityAssignment,
};
pub use google::google_matrix;
pub use power::{power_iterate, power_iterate_seeded, PowerIteration};

// ============================================================================
// Output table
// ============================================================================

/// Scores of every bipartite node against one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterColumn {
    pub label: String,
    /// One score per node, in `AffinityTable::nodes` order.
    pub scores: MetricOutcome<Vec<f64>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Node × cluster affinity scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinityTable {
    pub nodes: Vec<BipartiteNode>,
    pub columns: Vec<ClusterColumn>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AffinityTable {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    pub fn column(&self, label: &str) -> Option<&ClusterColumn> {
        self.columns.iter().find(|c| c.label == label)
    }

    /// `None` when the node is unknown or the cluster failed.
    pub fn score(&self, node: &BipartiteNode, label: &str) -> Option<f64> {
        let row = self.nodes.iter().position(|n| n == node)?;
        self.column(label)?.scores.value()?.get(row).copied()
    }
}

// ============================================================================
// Scoring
// ============================================================================

/// Group assignments into clusters, keeping first-appearance label order.
pub fn clusters_of(
    communities: &[CommunityAssignment],
    config: &AffinityConfig,
) -> Vec<(String, Vec<String>)> {
    let mut clusters: Vec<(String, Vec<String>)> = Vec::new();
    for assignment in communities {
        let marker = normalize_marker(&assignment.marker, config);
        match clusters.iter_mut().find(|(label, _)| *label == assignment.community) {
            Some((_, members)) => members.push(marker),
            None => clusters.push((assignment.community.clone(), vec![marker])),
        }
    }
    clusters
}

fn score_one(
    adjacency: &BipartiteAdjacency,
    position: usize,
    label: &str,
    members: &[String],
    config: &AffinityConfig,
) -> ClusterColumn {
    let seed = config.seed.wrapping_add(position as u64);
    match google_matrix(adjacency, members, config.alpha) {
        Ok(g) => {
            let run = power_iterate_seeded(&g, config.max_iter, config.tolerance, seed);
            debug!(cluster = label, iterations = run.iterations, converged = run.converged, "cluster scored");
            ClusterColumn {
                label: label.to_string(),
                diagnostics: run.diagnostic().into_iter().collect(),
                scores: MetricOutcome::Computed(run.vector),
            }
        }
        Err(e) => {
            warn!(cluster = label, error = %e, "cluster could not be scored");
            ClusterColumn {
                label: label.to_string(),
                scores: MetricOutcome::failed(&e),
                diagnostics: Vec::new(),
            }
        }
    }
}

/// Score every cluster over an already built adjacency.
pub fn score_clusters(
    adjacency: &BipartiteAdjacency,
    clusters: &[(String, Vec<String>)],
    config: &AffinityConfig,
) -> AffinityTable {
    let columns = score_columns(adjacency, clusters, config);
    AffinityTable {
        nodes: adjacency.nodes().to_vec(),
        columns,
        diagnostics: adjacency.diagnostic().into_iter().collect(),
    }
}

#[cfg(feature = "parallel")]
fn score_columns(
    adjacency: &BipartiteAdjacency,
    clusters: &[(String, Vec<String>)],
    config: &AffinityConfig,
) -> Vec<ClusterColumn> {
    use rayon::prelude::*;

    if config.parallel {
        return clusters
            .par_iter()
            .enumerate()
            .map(|(i, (label, members))| score_one(adjacency, i, label, members, config))
            .collect();
    }
    clusters
        .iter()
        .enumerate()
        .map(|(i, (label, members))| score_one(adjacency, i, label, members, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_columns(
    adjacency: &BipartiteAdjacency,
    clusters: &[(String, Vec<String>)],
    config: &AffinityConfig,
) -> Vec<ClusterColumn> {
    if config.parallel {
        debug!("parallel scoring requested without the `parallel` feature; scoring serially");
    }
    clusters
        .iter()
        .enumerate()
        .map(|(i, (label, members))| score_one(adjacency, i, label, members, config))
        .collect()
}

/// Full pass for one period: edges → adjacency → every community.
pub fn score_communities(
    markers: &EntityTable,
    communities: &[CommunityAssignment],
    config: &AffinityConfig,
) -> Result<AffinityTable> {
    config.validate()?;
    let edges = bipartite_edges(markers, communities, config);
    if edges.is_empty() {
        return Err(Error::EmptyInput("no marker occurrence belongs to a community".into()));
    }
    let adjacency = build_adjacency(&edges);
    let clusters = clusters_of(communities, config);
    info!(nodes = adjacency.len(), clusters = clusters.len(), "scoring community affinity");
    Ok(score_clusters(&adjacency, &clusters, config))
}

/// Run `score_communities` once per year of `documents`.
///
/// Assignments carrying a year only apply to that year; assignments
/// without one apply to every year.
pub fn score_periods(
    markers: &EntityTable,
    documents: &[Document],
    communities: &[CommunityAssignment],
    config: &AffinityConfig,
) -> BTreeMap<i32, Result<AffinityTable>> {
    split_by_year(documents)
        .into_iter()
        .map(|(year, ids): (i32, HashSet<String>)| {
            let in_year: Vec<CommunityAssignment> = communities
                .iter()
                .filter(|c| c.year.is_none_or(|y| y == year))
                .cloned()
                .collect();
            let table = score_communities(&markers.restrict_to(&ids), &in_year, config);
            (year, table)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityRow;

    fn hashtags(rows: &[(&str, u32, &str)]) -> EntityTable {
        rows.iter().map(|(d, i, t)| EntityRow::new(*d, *i, *t, "#")).collect()
    }

    #[test]
    fn test_clusters_keep_label_order() {
        let clusters = clusters_of(
            &[
                CommunityAssignment::new("#B", "two"),
                CommunityAssignment::new("#a", "one"),
                CommunityAssignment::new("#c", "two"),
            ],
            &AffinityConfig::default(),
        );
        assert_eq!(clusters[0], ("two".to_string(), vec!["#b".to_string(), "#c".to_string()]));
        assert_eq!(clusters[1].0, "one");
    }

    #[test]
    fn test_member_scores_higher_for_own_cluster() {
        let table = hashtags(&[
            ("t1", 0, "#strike"),
            ("t1", 1, "#youth"),
            ("t2", 0, "#youth"),
            ("t3", 0, "#policy"),
            ("t3", 1, "#strike"),
            ("t4", 0, "#policy"),
        ]);
        let communities = vec![
            CommunityAssignment::new("#youth", "activism"),
            CommunityAssignment::new("#policy", "politics"),
        ];
        let result = score_communities(&table, &communities, &AffinityConfig::default()).unwrap();
        assert_eq!(result.columns.len(), 2);
        // #strike is unlabeled, so it is not a node
        assert_eq!(result.nodes.len(), 2 + 4);

        let t2 = BipartiteNode::Document("t2".into());
        let t4 = BipartiteNode::Document("t4".into());
        assert!(result.score(&t2, "activism").unwrap() > result.score(&t2, "politics").unwrap());
        assert!(result.score(&t4, "politics").unwrap() > result.score(&t4, "activism").unwrap());
    }

    #[test]
    fn test_failed_cluster_is_a_gap() {
        let adjacency = build_adjacency(&[("t1".to_string(), "#a".to_string())]);
        let clusters = vec![
            ("ok".to_string(), vec!["#a".to_string()]),
            ("ghost".to_string(), vec!["#missing".to_string()]),
        ];
        let table = score_clusters(&adjacency, &clusters, &AffinityConfig::default());
        assert!(table.column("ok").unwrap().scores.is_computed());
        assert!(!table.column("ghost").unwrap().scores.is_computed());
        assert_eq!(table.score(&BipartiteNode::Marker("#a".into()), "ghost"), None);
    }

    #[test]
    fn test_no_labeled_markers_is_empty_input() {
        let table = hashtags(&[("t1", 0, "#x")]);
        let err = score_communities(&table, &[CommunityAssignment::new("#y", "c")], &AffinityConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }
}
