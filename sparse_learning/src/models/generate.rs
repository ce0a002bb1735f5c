use harness::ModelErr;
use ndarray::{Array1, Array2};
use std::ops::Range;

use rand::{Rng, seq::index};
use rand_distr::{Distribution, Normal};

/// Samples a `sample_size` x `dim` design with i.i.d. standard normal entries.
pub fn gaussian_design<R: Rng>(
    rng: &mut R,
    sample_size: usize,
    dim: usize,
) -> Result<Array2<f64>, ModelErr> {
    let normal = standard_normal()?;
    Ok(Array2::from_shape_simple_fn((sample_size, dim), || {
        normal.sample(rng)
    }))
}

/// Samples a coefficient vector with exactly `sparsity_level` non zero entries, at uniformly
/// chosen positions, with random signs and magnitudes in `[1, 2)`.
pub fn sparse_coefficients<R: Rng>(rng: &mut R, dim: usize, sparsity_level: usize) -> Array1<f64> {
    sparse_coefficients_in(rng, dim, sparsity_level, 1.0..2.0)
}

/// Like `sparse_coefficients`, with magnitudes drawn from `magnitudes`.
pub fn sparse_coefficients_in<R: Rng>(
    rng: &mut R,
    dim: usize,
    sparsity_level: usize,
    magnitudes: Range<f64>,
) -> Array1<f64> {
    let mut coefficients = Array1::zeros(dim);

    for i in index::sample(rng, dim, sparsity_level) {
        let magnitude: f64 = rng.random_range(magnitudes.clone());
        coefficients[i] = if rng.random_bool(0.5) {
            magnitude
        } else {
            -magnitude
        };
    }

    coefficients
}

/// Samples `n` i.i.d. standard normal values.
pub fn gaussian_noise<R: Rng>(rng: &mut R, n: usize) -> Result<Array1<f64>, ModelErr> {
    let normal = standard_normal()?;
    Ok(Array1::from_shape_simple_fn(n, || normal.sample(rng)))
}

fn standard_normal() -> Result<Normal<f64>, ModelErr> {
    Normal::new(0., 1.).map_err(|e| ModelErr::new(e.to_string()))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn exact_sparsity() {
        let mut rng = StdRng::seed_from_u64(42);

        for (dim, sparsity_level) in [(10, 1), (10, 10), (500, 50)] {
            let coefficients = sparse_coefficients(&mut rng, dim, sparsity_level);
            let nonzero = coefficients.iter().filter(|w| **w != 0.).count();

            assert_eq!(nonzero, sparsity_level);
            assert!(coefficients.iter().all(|w| *w == 0. || (1. ..2.).contains(&w.abs())));
        }
    }

    #[test]
    fn seeded_design_repeats() {
        let a = gaussian_design(&mut StdRng::seed_from_u64(7), 4, 3).unwrap();
        let b = gaussian_design(&mut StdRng::seed_from_u64(7), 4, 3).unwrap();
        let c = gaussian_design(&mut StdRng::seed_from_u64(8), 4, 3).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
