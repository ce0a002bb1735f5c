use harness::{Dataset, Model, ModelErr};
use ndarray::{Array1, Array2, ArrayView1};
use rand::{SeedableRng, rngs::StdRng};

use super::generate::{gaussian_noise, sparse_coefficients};

/// One dimensional trend filtering: a piecewise constant signal with sparse jumps, observed
/// with gaussian noise.
///
/// The parameters are the jumps, the design accumulates them, so row `i` sums every jump
/// placed at or before its position.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendFilter;

impl TrendFilter {
    /// Returns a new `TrendFilter`.
    pub fn new() -> Self {
        Self
    }

    /// The cumulative design, `x[i, j] = 1` whenever jump `j` happens at or before sample `i`.
    fn design(sample_size: usize, dim: usize) -> Array2<f64> {
        Array2::from_shape_fn((sample_size, dim), |(i, j)| {
            if j * sample_size <= i * dim { 1. } else { 0. }
        })
    }
}

impl Model for TrendFilter {
    fn name(&self) -> &str {
        "trend_filter"
    }

    fn generate(
        &self,
        sample_size: usize,
        dim: usize,
        sparsity_level: usize,
        seed: u64,
    ) -> Result<(Array1<f64>, Dataset), ModelErr> {
        let mut rng = StdRng::seed_from_u64(seed);

        let jumps = sparse_coefficients(&mut rng, dim, sparsity_level);
        let x = Self::design(sample_size, dim);
        let y = x.dot(&jumps) + gaussian_noise(&mut rng, sample_size)?;

        Ok((jumps, Dataset::new(x, y)))
    }

    fn loss(&self, params: ArrayView1<f64>, data: &Dataset) -> f64 {
        let residual = &data.y - &data.x.dot(&params);
        residual.dot(&residual) / (2. * data.len() as f64)
    }

    fn gradient(&self, params: ArrayView1<f64>, data: &Dataset) -> Array1<f64> {
        let residual = &data.x.dot(&params) - &data.y;
        data.x.t().dot(&residual) / data.len() as f64
    }
}
