//! Run configuration for the metrics and affinity stages.
//!
//! Every tunable that used to be a module-level constant is a field here
//! and is passed explicitly into the stage that needs it. Both configs
//! deserialize from partial JSON: missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ============================================================================
// Conventions
// ============================================================================

/// How edge weight turns into path length for betweenness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCost {
    /// `1 / weight`: strong ties are short.
    #[default]
    InverseWeight,
    /// `weight` used directly as a distance.
    Weight,
    /// Every edge costs one hop.
    Hops,
}

impl EdgeCost {
    pub fn length(self, weight: u64) -> f64 {
        match self {
            EdgeCost::InverseWeight => 1.0 / weight as f64,
            EdgeCost::Weight => weight as f64,
            EdgeCost::Hops => 1.0,
        }
    }
}

/// Which degree feeds the degree distribution and power-law fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeMode {
    /// Sum of incident edge weights.
    #[default]
    Weighted,
    /// Number of distinct neighbours.
    Unweighted,
}

/// Which degree observations enter the power-law estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitSelection {
    /// Every node degree `k >= k_sat`.
    #[default]
    ByValue,
    /// Sorted unique degrees from position `k_sat` onward (legacy slicing).
    LegacyPositional,
}

// ============================================================================
// AnalysisConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub damping: f64,
    pub pagerank_max_iter: usize,
    /// L1 change per node below which PageRank stops.
    pub pagerank_tolerance: f64,
    pub edge_cost: EdgeCost,
    pub normalized_betweenness: bool,
    pub degree_mode: DegreeMode,
    /// Saturation degree: lower cutoff of the power-law tail.
    pub k_sat: u64,
    pub fit_selection: FitSelection,
    /// Compute node metrics on the giant component only.
    pub giant_only: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            pagerank_max_iter: 100,
            pagerank_tolerance: 1e-6,
            edge_cost: EdgeCost::InverseWeight,
            normalized_betweenness: true,
            degree_mode: DegreeMode::Weighted,
            k_sat: 1,
            fit_selection: FitSelection::ByValue,
            giant_only: true,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        check_unit_interval("damping", self.damping)?;
        check_positive("pagerank_tolerance", self.pagerank_tolerance)?;
        if self.pagerank_max_iter == 0 {
            return Err(Error::InvalidParameter("pagerank_max_iter must be at least 1".into()));
        }
        if self.k_sat == 0 {
            return Err(Error::InvalidParameter("k_sat must be at least 1".into()));
        }
        Ok(())
    }
}

// ============================================================================
// AffinityConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityConfig {
    /// Damping factor: probability of following an edge instead of teleporting.
    pub alpha: f64,
    pub max_iter: usize,
    /// Absolute, elementwise tolerance between successive iterates.
    pub tolerance: f64,
    /// Base seed for the random start vector; cluster `i` uses `seed + i`.
    pub seed: u64,
    /// Campaign search hashtags, dropped before scoring.
    pub excluded_markers: Vec<String>,
    pub lowercase_markers: bool,
    /// Score clusters on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl Default for AffinityConfig {
    fn default() -> Self {
        Self {
            alpha: 0.9,
            max_iter: 100,
            tolerance: 1e-3,
            seed: 42,
            excluded_markers: [
                "#climatechange",
                "#climate",
                "#sdgs",
                "#sustainability",
                "#environment",
                "#globalwarming",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            lowercase_markers: true,
            parallel: false,
        }
    }
}

impl AffinityConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        check_unit_interval("alpha", self.alpha)?;
        check_positive("tolerance", self.tolerance)?;
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter("max_iter must be at least 1".into()));
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!("{name} must lie in (0, 1), got {value}")))
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!("{name} must be positive, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AnalysisConfig::from_json_str(r#"{"k_sat": 5, "edge_cost": "hops"}"#).unwrap();
        assert_eq!(config.k_sat, 5);
        assert_eq!(config.edge_cost, EdgeCost::Hops);
        assert_eq!(config.damping, 0.85);
    }

    #[test]
    fn test_rejects_bad_damping() {
        let err = AnalysisConfig::from_json_str(r#"{"damping": 1.5}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_affinity_defaults() {
        let config = AffinityConfig::default();
        assert_eq!(config.alpha, 0.9);
        assert_eq!(config.max_iter, 100);
        assert!(config.excluded_markers.contains(&"#climate".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_affinity_rejects_zero_iterations() {
        let err = AffinityConfig::from_json_str(r#"{"max_iter": 0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_edge_cost_lengths() {
        assert_eq!(EdgeCost::InverseWeight.length(4), 0.25);
        assert_eq!(EdgeCost::Weight.length(4), 4.0);
        assert_eq!(EdgeCost::Hops.length(4), 1.0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("affinity.json");
        std::fs::write(&path, r#"{"seed": 7, "excluded_markers": []}"#).unwrap();
        let config = AffinityConfig::from_json_path(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert!(config.excluded_markers.is_empty());
        assert_eq!(config.alpha, 0.9);

        assert!(matches!(AnalysisConfig::from_json_path(dir.path().join("missing.json")), Err(Error::Io(_))));
    }
}
