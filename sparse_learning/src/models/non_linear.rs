use harness::{Dataset, Model, ModelErr};
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use rand::{SeedableRng, rngs::StdRng, seq::index};

use super::generate::{gaussian_design, gaussian_noise};

/// Standard deviation of the noise added to the response.
const NOISE_SCALE: f64 = 0.1;

/// Non linear, non additive feature selection.
///
/// The response mixes the active features through pairwise products, `y = sum_t x_{s_t}
/// x_{s_{t+1}} + noise` around the cycle of active features `s`, so no feature acts on its
/// own. Features are scored with the HSIC lasso: the loss is `|| L - sum_j params_j K_j ||^2
/// / 2` over the centered, unit norm gaussian kernel matrices `K_j` of every feature and `L`
/// of the response.
///
/// That loss is a quadratic in the parameters, so the dataset keeps its coefficients instead
/// of the samples: `x` is the gram matrix `x[j, k] = <K_j, K_k>` and `y[j] = <K_j, L>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonLinear;

impl NonLinear {
    /// Returns a new `NonLinear`.
    pub fn new() -> Self {
        Self
    }
}

/// The centered gaussian kernel matrix of `values`, scaled to unit Frobenius norm.
fn gaussian_kernel(values: ArrayView1<f64>) -> Array2<f64> {
    let n = values.len();
    let mut kernel = Array2::from_shape_fn((n, n), |(a, b)| {
        let d = values[a] - values[b];
        (-d * d / 2.).exp()
    });

    // The kernel is symmetric, row and column means coincide.
    let means = kernel.sum_axis(Axis(0)) / n as f64;
    let grand = means.sum() / n as f64;
    Zip::indexed(&mut kernel).for_each(|(a, b), k| *k += grand - means[a] - means[b]);

    let norm = inner(&kernel, &kernel).sqrt();
    if norm > 0. {
        kernel /= norm;
    }

    kernel
}

/// The Frobenius inner product.
fn inner(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    Zip::from(a).and(b).fold(0., |acc, &a, &b| acc + a * b)
}

fn standardize(values: Array1<f64>) -> Result<Array1<f64>, ModelErr> {
    let mean = values
        .mean()
        .ok_or_else(|| ModelErr::new("the response is empty"))?;
    let std = values.std(0.);

    if !(std > 0.) {
        return Err(ModelErr::new("the response is constant"));
    }

    Ok((values - mean) / std)
}

impl Model for NonLinear {
    fn name(&self) -> &str {
        "non_linear"
    }

    fn generate(
        &self,
        sample_size: usize,
        dim: usize,
        sparsity_level: usize,
        seed: u64,
    ) -> Result<(Array1<f64>, Dataset), ModelErr> {
        let mut rng = StdRng::seed_from_u64(seed);

        let x = gaussian_design(&mut rng, sample_size, dim)?;
        let active = index::sample(&mut rng, dim, sparsity_level).into_vec();

        let mut params = Array1::zeros(dim);
        let mut y = gaussian_noise(&mut rng, sample_size)? * NOISE_SCALE;
        for (t, &j) in active.iter().enumerate() {
            let k = active[(t + 1) % active.len()];
            params[j] = 1.;
            y += &(&x.column(j) * &x.column(k));
        }

        let response = gaussian_kernel(standardize(y)?.view());
        let kernels: Vec<_> = x.columns().into_iter().map(gaussian_kernel).collect();

        let mut gram = Array2::zeros((dim, dim));
        for j in 0..dim {
            for k in j..dim {
                let product = inner(&kernels[j], &kernels[k]);
                gram[[j, k]] = product;
                gram[[k, j]] = product;
            }
        }
        let alignment = Array1::from_iter(kernels.iter().map(|kernel| inner(kernel, &response)));

        Ok((params, Dataset::new(gram, alignment)))
    }

    /// `params' x params / 2 - y' params + 1 / 2`
    fn loss(&self, params: ArrayView1<f64>, data: &Dataset) -> f64 {
        0.5 * params.dot(&data.x.dot(&params)) - data.y.dot(&params) + 0.5
    }

    fn gradient(&self, params: ArrayView1<f64>, data: &Dataset) -> Array1<f64> {
        data.x.dot(&params) - &data.y
    }

    /// One kernel matrix per feature plus the response's.
    fn footprint(&self, sample_size: usize, dim: usize) -> u64 {
        let kernels = (dim + 2) * sample_size * sample_size;
        ((kernels + dim * dim) * size_of::<f64>()) as u64
    }
}
