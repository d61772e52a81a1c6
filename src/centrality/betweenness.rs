//! Weighted betweenness centrality (Brandes' algorithm with Dijkstra).
//!
//! Path length follows `EdgeCost`; the default `InverseWeight` makes
//! frequent co-occurrences short. Scaling matches the usual undirected
//! convention: normalized scores divide by `(n-1)(n-2)`, raw scores count
//! each unordered pair once.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use smallvec::SmallVec;

use super::NodeScores;
use crate::config::EdgeCost;
use crate::model::{CoGraph, NodeId};

/// Relative slack when comparing path lengths built from float costs.
const PATH_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    dist: f64,
    node: usize,
}

impl Eq for Frontier {}

// Min-heap on distance.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other.dist.total_cmp(&self.dist).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn same_length(a: f64, b: f64) -> bool {
    (a - b).abs() <= PATH_EPSILON * a.abs().max(b.abs()).max(1.0)
}

pub fn betweenness(graph: &CoGraph, cost: EdgeCost, normalized: bool) -> NodeScores<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0_f64; n];

    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0_f64; n];
    let mut delta = vec![0.0_f64; n];
    let mut settled = vec![false; n];
    let mut preds: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); n];
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut heap = BinaryHeap::new();

    for source in 0..n {
        dist.fill(f64::INFINITY);
        sigma.fill(0.0);
        delta.fill(0.0);
        settled.fill(false);
        for p in preds.iter_mut() {
            p.clear();
        }
        order.clear();

        dist[source] = 0.0;
        sigma[source] = 1.0;
        heap.push(Frontier { dist: 0.0, node: source });

        while let Some(Frontier { dist: d, node: v }) = heap.pop() {
            if settled[v] {
                continue;
            }
            settled[v] = true;
            order.push(v);

            for (w, weight) in graph.neighbors(NodeId(v as u32)) {
                let w = w.index();
                if settled[w] {
                    continue;
                }
                let candidate = d + cost.length(*weight);
                if dist[w].is_infinite() || (candidate < dist[w] && !same_length(candidate, dist[w])) {
                    dist[w] = candidate;
                    sigma[w] = sigma[v];
                    preds[w].clear();
                    preds[w].push(v);
                    heap.push(Frontier { dist: candidate, node: w });
                } else if same_length(candidate, dist[w]) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        while let Some(w) = order.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                centrality[w] += delta[w];
            }
        }
    }

    // Every unordered pair was seen from both ends.
    let scale = match normalized {
        true if n > 2 => Some(1.0 / ((n - 1) * (n - 2)) as f64),
        true => None,
        false => Some(0.5),
    };
    if let Some(scale) = scale {
        centrality.iter_mut().for_each(|c| *c *= scale);
    }

    NodeScores::from_vec(centrality)
}
