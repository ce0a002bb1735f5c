use harness::{Dataset, Model, ModelErr};
use ndarray::{Array1, Array2, ArrayView1};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    generate::sparse_coefficients_in,
    link::{sigmoid, softplus},
};

/// Interaction strengths are drawn from this range, with a random sign.
const COUPLING: std::ops::Range<f64> = 0.2..0.5;

/// Gibbs sweeps discarded before the first sample.
const BURN_IN: usize = 100;

/// Gibbs sweeps between consecutive samples.
const THINNING: usize = 5;

/// A sparse Ising model over `p` spins, fitted with the negative log pseudo likelihood.
///
/// The parameters are the couplings of the `p (p - 1) / 2` spin pairs, ordered `(0, 1),
/// (0, 2), .., (p - 2, p - 1)`. The dataset holds, per sample, the product of the two spins
/// of every pair, so `x` has one column per coupling and `y` is unused.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ising;

impl Ising {
    /// Returns a new `Ising`.
    pub fn new() -> Self {
        Self
    }
}

/// The amount of spins with `dim` pairs, `None` if `dim` isn't `p (p - 1) / 2` for any `p`.
pub fn nodes(dim: usize) -> Option<usize> {
    let p = ((1. + (1. + 8. * dim as f64).sqrt()) / 2.).round() as usize;
    (p >= 2 && p * (p - 1) / 2 == dim).then_some(p)
}

/// Every spin pair, in parameter order.
fn edges(p: usize) -> Vec<(usize, usize)> {
    (0..p)
        .flat_map(|j| (j + 1..p).map(move |k| (j, k)))
        .collect()
}

/// Draws `sample_size` spin configurations with a Gibbs sampler over `couplings`.
fn gibbs<R: Rng>(rng: &mut R, couplings: &Array2<f64>, sample_size: usize) -> Array2<f64> {
    let p = couplings.nrows();
    let mut spins =
        Array1::from_shape_simple_fn(p, || if rng.random_bool(0.5) { 1. } else { -1. });
    let mut samples = Array2::zeros((sample_size, p));

    for _ in 0..BURN_IN {
        sweep(rng, couplings, &mut spins);
    }

    for mut row in samples.rows_mut() {
        for _ in 0..THINNING {
            sweep(rng, couplings, &mut spins);
        }
        row.assign(&spins);
    }

    samples
}

/// Resamples every spin once from its conditional, `P(s_j = 1 | rest) = sigmoid(2 h_j)`.
fn sweep<R: Rng>(rng: &mut R, couplings: &Array2<f64>, spins: &mut Array1<f64>) {
    for j in 0..spins.len() {
        let field = couplings.row(j).dot(&*spins);
        spins[j] = if rng.random::<f64>() < sigmoid(2. * field) { 1. } else { -1. };
    }
}

/// Every spin times its local field, `fields[i, j] = s_j * sum_k theta_jk s_k` over the spins
/// `s` of sample `i`.
fn fields(
    params: ArrayView1<f64>,
    data: &Dataset,
    edges: &[(usize, usize)],
    p: usize,
) -> Array2<f64> {
    let contributions = &data.x * &params;
    let mut fields = Array2::zeros((data.x.nrows(), p));

    for (e, &(j, k)) in edges.iter().enumerate() {
        let column = contributions.column(e);
        let mut field = fields.column_mut(j);
        field += &column;
        let mut field = fields.column_mut(k);
        field += &column;
    }

    fields
}

impl Model for Ising {
    fn name(&self) -> &str {
        "ising"
    }

    fn generate(
        &self,
        sample_size: usize,
        dim: usize,
        sparsity_level: usize,
        seed: u64,
    ) -> Result<(Array1<f64>, Dataset), ModelErr> {
        let p = nodes(dim).ok_or_else(|| {
            ModelErr::new(format!("dim ({dim}) is not the amount of pairs of any spin count"))
        })?;
        let edges = edges(p);
        let mut rng = StdRng::seed_from_u64(seed);

        let params = sparse_coefficients_in(&mut rng, dim, sparsity_level, COUPLING);
        let mut couplings = Array2::zeros((p, p));
        for (&(j, k), &theta) in edges.iter().zip(&params) {
            couplings[[j, k]] = theta;
            couplings[[k, j]] = theta;
        }

        let spins = gibbs(&mut rng, &couplings, sample_size);
        let x = Array2::from_shape_fn((sample_size, dim), |(i, e)| {
            let (j, k) = edges[e];
            spins[[i, j]] * spins[[i, k]]
        });

        Ok((params, Dataset::new(x, Array1::zeros(sample_size))))
    }

    /// `mean_i sum_j ln(1 + exp(-2 fields[i, j]))`
    fn loss(&self, params: ArrayView1<f64>, data: &Dataset) -> f64 {
        let Some(p) = nodes(data.x.ncols()) else {
            return f64::NAN;
        };

        let fields = fields(params, data, &edges(p), p);
        fields.mapv(|f| softplus(-2. * f)).sum() / data.x.nrows() as f64
    }

    fn gradient(&self, params: ArrayView1<f64>, data: &Dataset) -> Array1<f64> {
        let Some(p) = nodes(data.x.ncols()) else {
            return Array1::from_elem(params.len(), f64::NAN);
        };

        let edges = edges(p);
        let slopes = fields(params, data, &edges, p).mapv(|f| -2. * sigmoid(-2. * f));
        let n = data.x.nrows() as f64;

        Array1::from_iter(edges.iter().enumerate().map(|(e, &(j, k))| {
            let slope = &slopes.column(j) + &slopes.column(k);
            data.x.column(e).dot(&slope) / n
        }))
    }
}
