use std::{error::Error, fmt};

use ndarray::{Array1, Array2, ArrayView1};

/// Copies of the design a trial holds at its peak: the design itself plus the temporaries of
/// the loss and gradient evaluations.
const DESIGN_COPIES: usize = 3;

/// Error returned by a `Model` whenever its data generator cannot produce a sample, for
/// instance because a distribution parameter derived from the trial is invalid.
#[derive(Debug)]
pub struct ModelErr(String);

impl ModelErr {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for ModelErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ModelErr {}

/// The observed data of a trial, in the form its model's loss consumes.
///
/// Usually a design with one row per sample and a response with one entry per sample. Models
/// whose loss only needs summary statistics may store those instead, as long as `x` keeps one
/// column per parameter.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Self {
        Self { x, y }
    }

    /// The amount of entries of the response.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// A synthetic statistical model: a data generator together with the loss used to fit it.
///
/// Implementations must be deterministic, the same arguments always produce the same
/// parameters and dataset.
pub trait Model: Send + Sync {
    /// The identifier the model is registered under.
    fn name(&self) -> &str;

    /// Generates the ground truth parameters and the observed dataset.
    ///
    /// # Arguments
    /// * `sample_size` - The amount of rows of the dataset.
    /// * `dim` - The length of the parameter vector.
    /// * `sparsity_level` - The amount of non zero true parameters.
    /// * `seed` - Fixes the pseudo random stream.
    ///
    /// # Returns
    /// A tuple `(true_params, data)` or an error if generation is not possible.
    fn generate(
        &self,
        sample_size: usize,
        dim: usize,
        sparsity_level: usize,
        seed: u64,
    ) -> Result<(Array1<f64>, Dataset), ModelErr>;

    /// The scalar objective of `params` over `data`.
    fn loss(&self, params: ArrayView1<f64>, data: &Dataset) -> f64;

    /// The gradient of `loss` with respect to `params`.
    fn gradient(&self, params: ArrayView1<f64>, data: &Dataset) -> Array1<f64>;

    /// Rough peak bytes one trial of this model holds, used to budget concurrent trials.
    ///
    /// Defaults to a few copies of a dense `sample_size` x `dim` design.
    fn footprint(&self, sample_size: usize, dim: usize) -> u64 {
        let design = sample_size * dim * size_of::<f64>();
        let vectors = (sample_size + dim) * size_of::<f64>() * 8;
        (design * DESIGN_COPIES + vectors) as u64
    }
}

/// A differentiable scalar function of a parameter vector, what solvers minimize.
pub trait Objective {
    /// The length of the parameter vector.
    fn dim(&self) -> usize;

    fn value(&self, params: ArrayView1<f64>) -> f64;

    fn gradient(&self, params: ArrayView1<f64>) -> Array1<f64>;
}

/// A model's loss bound to one dataset.
pub struct BoundLoss<'a> {
    model: &'a dyn Model,
    data: &'a Dataset,
}

impl<'a> BoundLoss<'a> {
    pub fn new(model: &'a dyn Model, data: &'a Dataset) -> Self {
        Self { model, data }
    }
}

impl Objective for BoundLoss<'_> {
    fn dim(&self) -> usize {
        self.data.x.ncols()
    }

    fn value(&self, params: ArrayView1<f64>) -> f64 {
        self.model.loss(params, self.data)
    }

    fn gradient(&self, params: ArrayView1<f64>) -> Array1<f64> {
        self.model.gradient(params, self.data)
    }
}
