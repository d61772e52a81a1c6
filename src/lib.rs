//! # discourse-graph: Structural Metrics over Discourse Graphs
//!
//! Turns tables of tagged entities (words, hashtags) extracted from
//! tweets into weighted co-occurrence graphs and measures their
//! structure: connected components, centralities, degree distribution
//! with a power-law fit, and a cluster-biased "Google matrix" affinity
//! score over the document ↔ hashtag bipartite graph.
//!
//! ## Design Principles
//!
//! 1. **Immutable graphs**: `CoGraph` is never mutated after building;
//!    projections and metrics return new values
//! 2. **Injected configuration**: every constant lives in `AnalysisConfig`
//!    or `AffinityConfig`, never in module-level globals
//! 3. **Isolated metrics**: one failing metric leaves a labeled gap in the
//!    report, the others are still computed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use discourse_graph::{build_graph, analyze, AnalysisConfig, EntityRow, EntityTable, NodeIdentity};
//!
//! # fn example() -> discourse_graph::Result<()> {
//! let table: EntityTable = vec![
//!     EntityRow::new("d1", 0, "climate", "N"),
//!     EntityRow::new("d1", 1, "change", "N"),
//!     EntityRow::new("d2", 0, "climate", "N"),
//!     EntityRow::new("d2", 1, "strike", "N"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let graph = build_graph(&table, NodeIdentity::WordSense);
//! let report = analyze(&graph, &AnalysisConfig::default())?;
//! println!("giant component: {} nodes", report.giant_size());
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Graph Builder | `build` | `CoGraph` |
//! | Component Analyzer | `components` | `Vec<Component>`, diameter, projection |
//! | Centrality Engine | `centrality` | degree, betweenness, PageRank |
//! | Degree-Distribution Fitter | `distribution` | `DegreeStats`, `PowerLawFit` |
//! | Community-Affinity Scorer | `affinity` | `AffinityTable` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod build;
pub mod components;
pub mod centrality;
pub mod distribution;
pub mod affinity;
pub mod report;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    CoGraph, GraphBuilder, Edge, NodeId, NodeKey, NodeIdentity,
    EntityRow, EntityTable, Document,
};

// ============================================================================
// Re-exports: Stages
// ============================================================================

pub use config::{AnalysisConfig, AffinityConfig, EdgeCost, DegreeMode, FitSelection};
pub use build::{build_graph, build_graph_by, build_period_graphs, vocabulary, VocabularyEntry};
pub use components::{connected_components, diameter, giant_component, project, Component};
pub use centrality::{betweenness, degree, pagerank, NodeScores, PageRankParams, PageRankRun};
pub use distribution::{degree_stats, fit_power_law, DegreeStats, PowerLawFit};
pub use affinity::{
    build_adjacency, google_matrix, power_iterate, power_iterate_seeded,
    score_communities, score_periods,
    AffinityTable, BipartiteAdjacency, BipartiteNode, CommunityAssignment, DenseMatrix,
    PowerIteration,
};
pub use report::{analyze, analyze_periods, GraphReport, MetricOutcome};

// ============================================================================
// Diagnostics (non-fatal conditions)
// ============================================================================

/// Conditions that degrade a result without invalidating it.
///
/// These are logged through `tracing` when they occur and carried on the
/// result so callers can surface them.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The graph has more than one connected component.
    DisconnectedGraph { components: usize },
    /// An iterative solver used its whole budget without meeting tolerance.
    NonConvergence { iterations: usize },
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Empty cluster: {0}")]
    EmptyCluster(String),

    #[error("Invalid power-law fit domain for k_sat={k_sat}: {reason}")]
    InvalidFitDomain { k_sat: u64, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
