use harness::{Dataset, Model, ModelErr};
use ndarray::{Array1, ArrayView1};
use rand::{SeedableRng, rngs::StdRng};

use super::generate::{gaussian_design, gaussian_noise, sparse_coefficients};

/// Sparse linear regression with gaussian noise, fitted with the mean squared error.
#[derive(Debug, Default, Clone, Copy)]
pub struct Linear;

impl Linear {
    /// Returns a new `Linear`.
    pub fn new() -> Self {
        Self
    }
}

impl Model for Linear {
    fn name(&self) -> &str {
        "linear"
    }

    fn generate(
        &self,
        sample_size: usize,
        dim: usize,
        sparsity_level: usize,
        seed: u64,
    ) -> Result<(Array1<f64>, Dataset), ModelErr> {
        let mut rng = StdRng::seed_from_u64(seed);

        let coefficients = sparse_coefficients(&mut rng, dim, sparsity_level);
        let x = gaussian_design(&mut rng, sample_size, dim)?;
        let y = x.dot(&coefficients) + gaussian_noise(&mut rng, sample_size)?;

        Ok((coefficients, Dataset::new(x, y)))
    }

    /// `||y - x params||^2 / 2n`
    fn loss(&self, params: ArrayView1<f64>, data: &Dataset) -> f64 {
        let residual = &data.y - &data.x.dot(&params);
        residual.dot(&residual) / (2. * data.len() as f64)
    }

    fn gradient(&self, params: ArrayView1<f64>, data: &Dataset) -> Array1<f64> {
        let residual = &data.x.dot(&params) - &data.y;
        data.x.t().dot(&residual) / data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};

    use super::*;

    #[test]
    fn loss_at_truth_is_noise() {
        let x = Array2::eye(3);
        let y = array![1., 2., 3.];
        let data = Dataset::new(x, y.clone());

        assert_eq!(Linear.loss(y.view(), &data), 0.);
        assert_eq!(Linear.loss(array![0., 0., 0.].view(), &data), 14. / 6.);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let (_, data) = Linear.generate(20, 5, 2, 3).unwrap();
        let params = array![0.3, -0.2, 0.1, 0.0, 1.0];
        let grad = Linear.gradient(params.view(), &data);

        const H: f64 = 1e-6;
        for j in 0..params.len() {
            let mut up = params.clone();
            let mut down = params.clone();
            up[j] += H;
            down[j] -= H;
            let numeric = (Linear.loss(up.view(), &data) - Linear.loss(down.view(), &data)) / (2. * H);
            assert!((numeric - grad[j]).abs() < 1e-5, "coordinate {j}");
        }
    }

    #[test]
    fn generation_is_reproducible() {
        let (a, data_a) = Linear.generate(50, 10, 3, 11).unwrap();
        let (b, data_b) = Linear.generate(50, 10, 3, 11).unwrap();

        assert_eq!(a, b);
        assert_eq!(data_a.x, data_b.x);
        assert_eq!(data_a.y, data_b.y);
        assert_eq!(data_a.x.dim(), (50, 10));
    }
}
