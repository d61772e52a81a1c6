//! Per-graph metrics report.
//!
//! `analyze` runs every structural metric on one graph: components over
//! the whole graph (diameter on the giant only), then node metrics and the
//! degree distribution on the giant-component projection. Metrics that can
//! fail are stored as `MetricOutcome`, so one failure never hides the
//! others.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::centrality::{betweenness, degree, pagerank, PageRankParams};
use crate::components::{connected_components, diameter, project};
use crate::config::AnalysisConfig;
use crate::distribution::{degree_stats, fit_power_law, DegreeStats, PowerLawFit};
use crate::model::CoGraph;
use crate::{Diagnostic, Error, Result};

// ============================================================================
// MetricOutcome
// ============================================================================

/// A computed metric or a labeled gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum MetricOutcome<T> {
    Computed(T),
    Failed { reason: String },
}

impl<T> MetricOutcome<T> {
    pub fn failed(error: &Error) -> Self {
        MetricOutcome::Failed { reason: error.to_string() }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            MetricOutcome::Computed(v) => Some(v),
            MetricOutcome::Failed { .. } => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, MetricOutcome::Computed(_))
    }
}

impl<T> From<Result<T>> for MetricOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => MetricOutcome::Computed(v),
            Err(e) => MetricOutcome::failed(&e),
        }
    }
}

// ============================================================================
// GraphReport
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub size: usize,
    pub members: Vec<String>,
    /// Only set on the giant component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphReport {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_weight: u64,
    /// Largest first.
    pub components: Vec<ComponentSummary>,
    pub degree: BTreeMap<String, u64>,
    pub betweenness: BTreeMap<String, f64>,
    pub pagerank: BTreeMap<String, f64>,
    pub degree_distribution: DegreeStats,
    pub power_law: MetricOutcome<PowerLawFit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GraphReport {
    pub fn giant_size(&self) -> usize {
        self.components.first().map_or(0, |c| c.size)
    }

    pub fn giant_diameter(&self) -> Option<usize> {
        self.components.first().and_then(|c| c.diameter)
    }
}

pub fn analyze(graph: &CoGraph, config: &AnalysisConfig) -> Result<GraphReport> {
    config.validate()?;

    let components = connected_components(graph);
    let giant = components.first().map(|c| project(graph, c.members.iter().copied()));
    let giant_diameter = giant.as_ref().map(diameter);

    let summaries = components
        .iter()
        .enumerate()
        .map(|(i, c)| ComponentSummary {
            size: c.size,
            members: c.keys(graph).into_iter().map(ToString::to_string).collect(),
            diameter: if i == 0 { giant_diameter } else { None },
        })
        .collect();

    let target = match (&giant, config.giant_only) {
        (Some(g), true) => g,
        _ => graph,
    };

    let mut diagnostics = Vec::new();
    let rank = pagerank(target, PageRankParams::from(config));
    diagnostics.extend(rank.diagnostic());

    let power_law: MetricOutcome<PowerLawFit> =
        fit_power_law(target, config.k_sat, config.degree_mode, config.fit_selection).into();
    if let MetricOutcome::Failed { reason } = &power_law {
        warn!(k_sat = config.k_sat, %reason, "power-law fit failed");
    }

    let report = GraphReport {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        total_weight: graph.total_weight(),
        components: summaries,
        degree: degree(target).by_label(target),
        betweenness: betweenness(target, config.edge_cost, config.normalized_betweenness)
            .by_label(target),
        pagerank: rank.scores.by_label(target),
        degree_distribution: degree_stats(target, config.degree_mode),
        power_law,
        diagnostics,
    };

    info!(
        nodes = report.node_count,
        edges = report.edge_count,
        components = report.components.len(),
        giant = report.giant_size(),
        "graph analyzed"
    );
    Ok(report)
}

/// `analyze` every graph, keyed the same way as the input.
pub fn analyze_periods<K>(
    graphs: &BTreeMap<K, CoGraph>,
    config: &AnalysisConfig,
) -> Result<BTreeMap<K, GraphReport>>
where
    K: Ord + Clone,
{
    graphs
        .iter()
        .map(|(period, graph)| Ok((period.clone(), analyze(graph, config)?)))
        .collect()
}
