use harness::{Dataset, Model, ModelErr};
use ndarray::{Array1, ArrayView1};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    generate::{gaussian_design, sparse_coefficients},
    link::{sigmoid, softplus},
};

/// Sparse logistic regression, fitted with the mean negative log likelihood.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logistic;

impl Logistic {
    /// Returns a new `Logistic`.
    pub fn new() -> Self {
        Self
    }
}

impl Model for Logistic {
    fn name(&self) -> &str {
        "logistic"
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
        let y = x
            .dot(&coefficients)
            .mapv(|z| if rng.random::<f64>() < sigmoid(z) { 1. } else { 0. });

        Ok((coefficients, Dataset::new(x, y)))
    }

    fn loss(&self, params: ArrayView1<f64>, data: &Dataset) -> f64 {
        let z = data.x.dot(&params);
        let total: f64 = z
            .iter()
            .zip(&data.y)
            .map(|(&z, &y)| softplus(z) - y * z)
            .sum();

        total / data.len() as f64
    }

    fn gradient(&self, params: ArrayView1<f64>, data: &Dataset) -> Array1<f64> {
        let residual = data.x.dot(&params).mapv(sigmoid) - &data.y;
        data.x.t().dot(&residual) / data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn labels_are_binary() {
        let (_, data) = Logistic.generate(100, 10, 3, 5).unwrap();
        assert!(data.y.iter().all(|&y| y == 0. || y == 1.));
    }

    #[test]
    fn loss_at_zero_is_ln2() {
        let (_, data) = Logistic.generate(40, 6, 2, 1).unwrap();
        let loss = Logistic.loss(Array1::zeros(6).view(), &data);

        assert!((loss - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let (_, data) = Logistic.generate(30, 4, 2, 9).unwrap();
        let params = array![0.5, -1.0, 0.0, 0.25];
        let grad = Logistic.gradient(params.view(), &data);

        const H: f64 = 1e-6;
        for j in 0..params.len() {
            let mut up = params.clone();
            let mut down = params.clone();
            up[j] += H;
            down[j] -= H;
            let numeric =
                (Logistic.loss(up.view(), &data) - Logistic.loss(down.view(), &data)) / (2. * H);
            assert!((numeric - grad[j]).abs() < 1e-5, "coordinate {j}");
        }
    }
}
