//! Cluster-biased Google matrix.
//!
//! Column convention: `x_{t+1} = G · x_t`. Columns of the adjacency matrix
//! are normalized to sum to 1, scaled by `alpha`, and every row belonging
//! to a cluster member gains `(1 - alpha) / |cluster|`, so teleports land
//! uniformly inside the cluster. Columns of nodes without edges become
//! uniform (`1 / n`) before scaling, which keeps `G` column-stochastic.

use hashbrown::HashSet;
use tracing::warn;

use super::{BipartiteAdjacency, BipartiteNode, DenseMatrix};
use crate::{Error, Result};

pub fn google_matrix(
    adjacency: &BipartiteAdjacency,
    cluster: &[String],
    alpha: f64,
) -> Result<DenseMatrix> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidParameter(format!("alpha must lie in [0, 1], got {alpha}")));
    }
    if cluster.is_empty() {
        return Err(Error::EmptyCluster("cluster has no members".into()));
    }

    let mut members: Vec<usize> = Vec::with_capacity(cluster.len());
    let mut seen = HashSet::new();
    let mut missing = 0usize;
    for marker in cluster {
        match adjacency.node_index(&BipartiteNode::Marker(marker.clone())) {
            Some(i) if seen.insert(i) => members.push(i),
            Some(_) => {}
            None => missing += 1,
        }
    }
    if missing > 0 {
        warn!(missing, requested = cluster.len(), "cluster members absent from the bipartite graph");
    }
    if members.is_empty() {
        return Err(Error::EmptyCluster(format!(
            "none of the {} cluster members occur in the bipartite graph",
            cluster.len()
        )));
    }

    let n = adjacency.len();
    let a = adjacency.matrix();
    let sums = a.column_sums();
    let mut g = DenseMatrix::zeros(n);
    for i in 0..n {
        let row = g.row_mut(i);
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = if sums[j] > 0.0 {
                alpha * a.get(i, j) / sums[j]
            } else {
                alpha / n as f64
            };
        }
    }

    let teleport = (1.0 - alpha) / members.len() as f64;
    for i in members {
        g.row_mut(i).iter_mut().for_each(|cell| *cell += teleport);
    }

    Ok(g)
}
