use harness::{Dataset, Model, ModelErr};
use ndarray::{Array1, ArrayView1};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StudentT};

use super::generate::{gaussian_design, sparse_coefficients};

/// The bandwidth of the exponential squared loss.
const BANDWIDTH: f64 = 5.;

/// The degrees of freedom of the heavy tailed noise.
const NOISE_DOF: f64 = 2.;

/// Sparse linear regression under heavy tailed noise, fitted with the exponential squared
/// loss `mean(1 - exp(-r^2 / h))`, which caps the influence of outliers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RobustEsl;

impl RobustEsl {
    /// Returns a new `RobustEsl`.
    pub fn new() -> Self {
        Self
    }
}

impl Model for RobustEsl {
    fn name(&self) -> &str {
        "robust_ESL"
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

        let student = StudentT::new(NOISE_DOF).map_err(|e| ModelErr::new(e.to_string()))?;
        let noise = Array1::from_shape_simple_fn(sample_size, || student.sample(&mut rng));
        let y = x.dot(&coefficients) + noise;

        Ok((coefficients, Dataset::new(x, y)))
    }

    fn loss(&self, params: ArrayView1<f64>, data: &Dataset) -> f64 {
        let residual = &data.y - &data.x.dot(&params);
        residual
            .mapv(|r| 1. - (-r * r / BANDWIDTH).exp())
            .mean()
            .unwrap_or_default()
    }

    fn gradient(&self, params: ArrayView1<f64>, data: &Dataset) -> Array1<f64> {
        let residual = &data.y - &data.x.dot(&params);
        let weights = residual.mapv(|r| -2. * r * (-r * r / BANDWIDTH).exp() / BANDWIDTH);
        data.x.t().dot(&weights) / data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn loss_is_bounded() {
        let (_, data) = RobustEsl.generate(50, 10, 3, 2).unwrap();
        let far = Array1::from_elem(10, 1e3);

        let loss = RobustEsl.loss(far.view(), &data);
        assert!((0. ..=1.).contains(&loss));
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let (_, data) = RobustEsl.generate(30, 4, 2, 6).unwrap();
        let params = array![0.5, -1.0, 0.0, 0.25];
        let grad = RobustEsl.gradient(params.view(), &data);

        const H: f64 = 1e-6;
        for j in 0..params.len() {
            let mut up = params.clone();
            let mut down = params.clone();
            up[j] += H;
            down[j] -= H;
            let numeric =
                (RobustEsl.loss(up.view(), &data) - RobustEsl.loss(down.view(), &data)) / (2. * H);
            assert!((numeric - grad[j]).abs() < 1e-5, "coordinate {j}");
        }
    }
}
