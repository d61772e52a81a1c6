//! Power iteration for the dominant eigenvector.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::DenseMatrix;
use crate::Diagnostic;

/// Unit-L2 eigenvector estimate and solver state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerIteration {
    pub vector: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

impl PowerIteration {
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        (!self.converged).then_some(Diagnostic::NonConvergence { iterations: self.iterations })
    }
}

/// Multiply and renormalize until successive iterates agree elementwise
/// within `tolerance` (absolute), or `max_iter` is spent.
///
/// The start vector is drawn uniformly from `[0, 1)` with `rng`. The
/// result has unit Euclidean norm; it is a score, not a distribution.
pub fn power_iterate<R: Rng + ?Sized>(
    g: &DenseMatrix,
    max_iter: usize,
    tolerance: f64,
    rng: &mut R,
) -> PowerIteration {
    let n = g.dim();
    if n == 0 {
        return PowerIteration { vector: Vec::new(), iterations: 0, converged: true };
    }

    let mut current: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>()).collect();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iter {
        iterations += 1;
        let mut next = g.mul_vec(&current);
        let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            warn!(iterations, "power iteration collapsed to a zero vector");
            break;
        }
        next.iter_mut().for_each(|x| *x /= norm);

        let stable = next.iter().zip(&current).all(|(a, b)| (a - b).abs() <= tolerance);
        current = next;
        if stable {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(iterations, max_iter, "power iteration stopped without meeting tolerance");
    }

    PowerIteration { vector: current, iterations, converged }
}

/// `power_iterate` with a fresh `StdRng` seeded from `seed`.
pub fn power_iterate_seeded(g: &DenseMatrix, max_iter: usize, tolerance: f64, seed: u64) -> PowerIteration {
    let mut rng = StdRng::seed_from_u64(seed);
    power_iterate(g, max_iter, tolerance, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubly_stochastic_converges_to_uniform() {
        let g = DenseMatrix::from_rows(vec![
            vec![0.5, 0.25, 0.25],
            vec![0.25, 0.5, 0.25],
            vec![0.25, 0.25, 0.5],
        ])
        .unwrap();
        let run = power_iterate_seeded(&g, 200, 1e-9, 7);
        assert!(run.converged);
        let expected = 1.0 / 3f64.sqrt();
        for x in &run.vector {
            assert!((x - expected).abs() < 1e-6);
        }
        let norm: f64 = run.vector.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_vector() {
        let g = DenseMatrix::from_rows(vec![vec![0.9, 0.2], vec![0.1, 0.8]]).unwrap();
        let a = power_iterate_seeded(&g, 50, 1e-6, 42);
        let b = power_iterate_seeded(&g, 50, 1e-6, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_budget_exhausted() {
        // rotation never settles
        let g = DenseMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let run = power_iterate_seeded(&g, 5, 1e-12, 3);
        assert_eq!(run.iterations, 5);
        assert!(!run.converged);
        assert_eq!(run.diagnostic(), Some(Diagnostic::NonConvergence { iterations: 5 }));
    }
}
