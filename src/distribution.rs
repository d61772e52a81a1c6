//! # Degree-Distribution Fitter
//!
//! Empirical degree distribution and a discrete power-law tail fit.
//!
//! The tail exponent uses the maximum-likelihood estimator
//! `gamma = 1 + n / Σ ln(k_i / k_sat)`, normalization
//! `c = (gamma - 1) k_sat^(gamma - 1)` and natural cutoff
//! `k_sat n^(1 / (gamma - 1))`.

use serde::{Deserialize, Serialize};

use crate::centrality::{degree, unweighted_degree};
use crate::config::{DegreeMode, FitSelection};
use crate::model::CoGraph;
use crate::{Error, Result};

// ============================================================================
// Degree statistics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeStats {
    /// Distinct degree values, ascending.
    pub degrees: Vec<u64>,
    pub counts: Vec<usize>,
    pub pdf: Vec<f64>,
    /// `1 - cumsum(pdf)`, last entry pinned to exactly 0.
    pub cdf: Vec<f64>,
}

impl DegreeStats {
    pub fn from_degrees(sequence: &[u64]) -> Self {
        let mut sorted = sequence.to_vec();
        sorted.sort_unstable();

        let mut degrees: Vec<u64> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        for k in sorted {
            match degrees.last() {
                Some(last) if *last == k => {
                    if let Some(c) = counts.last_mut() {
                        *c += 1;
                    }
                }
                _ => {
                    degrees.push(k);
                    counts.push(1);
                }
            }
        }

        let total = sequence.len() as f64;
        let pdf: Vec<f64> = counts.iter().map(|c| *c as f64 / total).collect();
        let mut running = 0.0;
        let mut cdf: Vec<f64> = pdf
            .iter()
            .map(|p| {
                running += p;
                1.0 - running
            })
            .collect();
        if let Some(last) = cdf.last_mut() {
            *last = 0.0;
        }

        Self { degrees, counts, pdf, cdf }
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }
}

pub fn degree_sequence(graph: &CoGraph, mode: DegreeMode) -> Vec<u64> {
    match mode {
        DegreeMode::Weighted => degree(graph).values().to_vec(),
        DegreeMode::Unweighted => unweighted_degree(graph).values().to_vec(),
    }
}

pub fn degree_stats(graph: &CoGraph, mode: DegreeMode) -> DegreeStats {
    DegreeStats::from_degrees(&degree_sequence(graph, mode))
}

// ============================================================================
// Power-law fit
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerLawFit {
    pub k_sat: u64,
    pub k_min: u64,
    pub k_max: u64,
    pub gamma: f64,
    pub c: f64,
    pub cutoff: f64,
    /// Number of observations that entered the estimator.
    pub n: usize,
    pub selection: FitSelection,
}

pub fn fit_power_law(
    graph: &CoGraph,
    k_sat: u64,
    mode: DegreeMode,
    selection: FitSelection,
) -> Result<PowerLawFit> {
    fit_degree_sequence(&degree_sequence(graph, mode), k_sat, selection)
}

/// Fit the tail of a raw degree sequence.
///
/// `ByValue` keeps every `k >= k_sat`. `LegacyPositional` reproduces the
/// older slicing of the sorted unique degrees from position `k_sat`, which
/// is not the MLE domain and is kept only for comparison with past runs.
pub fn fit_degree_sequence(
    sequence: &[u64],
    k_sat: u64,
    selection: FitSelection,
) -> Result<PowerLawFit> {
    if k_sat == 0 {
        return Err(Error::InvalidFitDomain { k_sat, reason: "k_sat must be positive".into() });
    }

    let observations: Vec<u64> = match selection {
        FitSelection::ByValue => sequence.iter().copied().filter(|k| *k >= k_sat).collect(),
        FitSelection::LegacyPositional => {
            let unique = DegreeStats::from_degrees(sequence).degrees;
            unique.get(k_sat as usize..).map(<[u64]>::to_vec).unwrap_or_default()
        }
    };

    let (Some(&k_min), Some(&k_max)) = (observations.iter().min(), observations.iter().max()) else {
        return Err(Error::InvalidFitDomain {
            k_sat,
            reason: "no degree observations in the fit domain".into(),
        });
    };

    let n = observations.len();
    let k0 = k_sat as f64;
    let log_sum: f64 = observations.iter().map(|k| (*k as f64 / k0).ln()).sum();
    if !(log_sum > 0.0 && log_sum.is_finite()) {
        return Err(Error::InvalidFitDomain {
            k_sat,
            reason: format!("log-likelihood denominator is {log_sum}; tail carries no spread"),
        });
    }

    let gamma = 1.0 + n as f64 / log_sum;
    let c = (gamma - 1.0) * k0.powf(gamma - 1.0);
    let cutoff = k0 * (n as f64).powf(1.0 / (gamma - 1.0));

    Ok(PowerLawFit { k_sat, k_min, k_max, gamma, c, cutoff, n, selection })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stats_pdf_and_cdf() {
        let stats = DegreeStats::from_degrees(&[1, 1, 2, 3]);
        assert_eq!(stats.degrees, vec![1, 2, 3]);
        assert_eq!(stats.counts, vec![2, 1, 1]);
        assert_eq!(stats.pdf, vec![0.5, 0.25, 0.25]);
        assert_eq!(stats.cdf, vec![0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_stats_empty() {
        assert!(DegreeStats::from_degrees(&[]).is_empty());
    }

    #[test]
    fn test_fit_by_value() {
        let fit = fit_degree_sequence(&[1, 3, 3], 1, FitSelection::ByValue).unwrap();
        let expected = 1.0 + 3.0 / (2.0 * 3f64.ln());
        assert!((fit.gamma - expected).abs() < 1e-12);
        assert_eq!(fit.n, 3);
        assert_eq!((fit.k_min, fit.k_max), (1, 3));
        assert!((fit.c - (fit.gamma - 1.0)).abs() < 1e-12);
        let cutoff = 3f64.powf(1.0 / (fit.gamma - 1.0));
        assert!((fit.cutoff - cutoff).abs() < 1e-9);
    }

    #[test]
    fn test_fit_positional_differs_from_value() {
        let seq = [2, 2, 2, 2, 5, 9, 20];
        let by_value = fit_degree_sequence(&seq, 2, FitSelection::ByValue).unwrap();
        let legacy = fit_degree_sequence(&seq, 2, FitSelection::LegacyPositional).unwrap();
        assert_eq!(by_value.n, 7);
        // unique = [2, 5, 9, 20], position 2 onward = [9, 20]
        assert_eq!(legacy.n, 2);
        assert_eq!(legacy.k_min, 9);
        assert!(by_value.gamma != legacy.gamma);
    }

    #[test]
    fn test_fit_without_tail_fails() {
        let err = fit_degree_sequence(&[1, 2, 3], 10, FitSelection::ByValue).unwrap_err();
        assert!(matches!(err, Error::InvalidFitDomain { k_sat: 10, .. }));
    }

    #[test]
    fn test_fit_flat_tail_fails() {
        let err = fit_degree_sequence(&[4, 4, 4], 4, FitSelection::ByValue).unwrap_err();
        assert!(matches!(err, Error::InvalidFitDomain { .. }));
    }

    #[test]
    fn test_fit_rejects_zero_k_sat() {
        assert!(fit_degree_sequence(&[1, 2], 0, FitSelection::ByValue).is_err());
    }
}
