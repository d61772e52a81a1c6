//! End-to-end tests for the degree distribution and the power-law fit.

use discourse_graph::distribution::fit_degree_sequence;
use discourse_graph::{
    degree_stats, fit_power_law, CoGraph, DegreeMode, Error, FitSelection, NodeKey,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn star(leaves: usize) -> CoGraph {
    CoGraph::from_weighted_edges(
        (0..leaves).map(|i| (NodeKey::hashtag("hub"), NodeKey::hashtag(format!("leaf{i}")), 1)),
    )
}

#[test]
fn test_star_distribution() {
    let stats = degree_stats(&star(5), DegreeMode::Weighted);
    assert_eq!(stats.degrees, vec![1, 5]);
    assert_eq!(stats.counts, vec![5, 1]);
    assert!((stats.pdf.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    assert_eq!(stats.cdf.last().copied(), Some(0.0));
}

#[test]
fn test_star_fit() {
    let fit = fit_power_law(&star(5), 1, DegreeMode::Weighted, FitSelection::ByValue).unwrap();
    assert_eq!(fit.n, 6);
    assert_eq!((fit.k_min, fit.k_max), (1, 5));
    let expected = 1.0 + 6.0 / 5f64.ln();
    assert!((fit.gamma - expected).abs() < 1e-12);
    assert!((fit.c - (expected - 1.0)).abs() < 1e-12);
}

#[test]
fn test_unweighted_mode_ignores_weights() {
    let g = CoGraph::from_weighted_edges(vec![
        (NodeKey::hashtag("a"), NodeKey::hashtag("b"), 9),
        (NodeKey::hashtag("b"), NodeKey::hashtag("c"), 9),
    ]);
    assert_eq!(degree_stats(&g, DegreeMode::Unweighted).degrees, vec![1, 2]);
    assert_eq!(degree_stats(&g, DegreeMode::Weighted).degrees, vec![9, 18]);
}

#[test]
fn test_k_sat_above_every_degree_is_invalid() {
    let err = fit_power_law(&star(3), 50, DegreeMode::Weighted, FitSelection::ByValue).unwrap_err();
    assert!(matches!(err, Error::InvalidFitDomain { k_sat: 50, .. }));
}

#[test]
fn test_recovers_exponent_of_sampled_power_law() {
    let (gamma, k_sat, n) = (2.5_f64, 50_u64, 20_000);
    let mut rng = StdRng::seed_from_u64(2019);
    let sample: Vec<u64> = (0..n)
        .map(|_| {
            let u: f64 = rng.r#gen();
            (k_sat as f64 * (1.0 - u).powf(-1.0 / (gamma - 1.0))).round() as u64
        })
        .collect();

    let fit = fit_degree_sequence(&sample, k_sat, FitSelection::ByValue).unwrap();
    assert_eq!(fit.n, n);
    assert!((fit.gamma - gamma).abs() < 0.1, "gamma = {}", fit.gamma);
}
