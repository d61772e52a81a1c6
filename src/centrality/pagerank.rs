//! Weighted PageRank by power iteration.
//!
//! Each undirected edge is walked in both directions with probability
//! proportional to its weight. Isolated nodes redistribute their rank
//! uniformly, and `1 - damping` teleports uniformly over all nodes, so the
//! scores always sum to 1.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::NodeScores;
use crate::config::AnalysisConfig;
use crate::model::CoGraph;
use crate::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRankParams {
    pub damping: f64,
    pub max_iter: usize,
    /// Stop once the L1 change drops below `n * tolerance`.
    pub tolerance: f64,
}

impl Default for PageRankParams {
    fn default() -> Self {
        Self { damping: 0.85, max_iter: 100, tolerance: 1e-6 }
    }
}

impl From<&AnalysisConfig> for PageRankParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            damping: config.damping,
            max_iter: config.pagerank_max_iter,
            tolerance: config.pagerank_tolerance,
        }
    }
}

/// Scores plus how the solver got there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankRun {
    pub scores: NodeScores<f64>,
    pub iterations: usize,
    pub converged: bool,
}

impl PageRankRun {
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        (!self.converged).then_some(Diagnostic::NonConvergence { iterations: self.iterations })
    }
}

pub fn pagerank(graph: &CoGraph, params: PageRankParams) -> PageRankRun {
    let n = graph.node_count();
    if n == 0 {
        return PageRankRun { scores: NodeScores::from_vec(Vec::new()), iterations: 0, converged: true };
    }

    let uniform = 1.0 / n as f64;
    let strength: Vec<f64> = graph
        .node_ids()
        .map(|id| graph.neighbors(id).iter().map(|(_, w)| *w as f64).sum())
        .collect();

    let mut rank = vec![uniform; n];
    let mut next = vec![0.0; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iter {
        iterations += 1;

        let dangling: f64 = rank
            .iter()
            .zip(&strength)
            .filter(|(_, s)| **s == 0.0)
            .map(|(r, _)| *r)
            .sum();
        let base = params.damping * dangling * uniform + (1.0 - params.damping) * uniform;
        next.fill(base);

        for source in graph.node_ids() {
            let s = strength[source.index()];
            if s == 0.0 {
                continue;
            }
            let share = params.damping * rank[source.index()] / s;
            for (target, weight) in graph.neighbors(source) {
                next[target.index()] += share * *weight as f64;
            }
        }

        let change: f64 = next.iter().zip(&rank).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut rank, &mut next);
        if change < n as f64 * params.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(iterations, nodes = n, "PageRank did not converge; returning last iterate");
    }

    let total: f64 = rank.iter().sum();
    if total > 0.0 {
        rank.iter_mut().for_each(|r| *r /= total);
    }

    PageRankRun { scores: NodeScores::from_vec(rank), iterations, converged }
}
