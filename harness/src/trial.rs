use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    HarnessErr, Result,
    config::HarnessConfig,
    model::BoundLoss,
    registry::ModelRegistry,
    result::SolverResult,
    runner::{FixedRunner, SweptRunner, TrialContext},
    solver::SolverFactory,
    support::Support,
};

/// The parameters of one trial.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrialSpec {
    pub model: String,
    pub sample_size: usize,
    pub dim: usize,
    pub sparsity_level: usize,
    pub seed: u64,
}

impl TrialSpec {
    pub fn new(
        model: impl Into<String>,
        sample_size: usize,
        dim: usize,
        sparsity_level: usize,
        seed: u64,
    ) -> Self {
        Self {
            model: model.into(),
            sample_size,
            dim,
            sparsity_level,
            seed,
        }
    }

    /// Checks the dimensions are consistent.
    ///
    /// # Errors
    /// `HarnessErr::InvalidTrial` if `sample_size` or `dim` is zero, or if `sparsity_level`
    /// isn't in `1..=dim`.
    pub fn validate(&self) -> Result<()> {
        let &Self {
            sample_size,
            dim,
            sparsity_level,
            ..
        } = self;

        if sample_size == 0 || dim == 0 {
            return Err(HarnessErr::InvalidTrial(format!(
                "sample_size ({sample_size}) and dim ({dim}) must be greater than 0"
            )));
        }

        if sparsity_level == 0 || sparsity_level > dim {
            return Err(HarnessErr::InvalidTrial(format!(
                "sparsity_level ({sparsity_level}) must be between 1 and dim ({dim})"
            )));
        }

        Ok(())
    }
}

/// Evaluates trials: generates the data, runs every configured solver over it and collects
/// one `SolverResult` per solver.
///
/// Holds no mutable state, so a single instance can evaluate trials from many threads.
pub struct Harness {
    registry: ModelRegistry,
    factory: Box<dyn SolverFactory>,
    config: HarnessConfig,
}

impl Harness {
    /// Returns a new `Harness`.
    ///
    /// # Arguments
    /// * `registry` - The models trials may name.
    /// * `factory` - Builds the configured solvers.
    /// * `config` - The solver sets and the step size ladder.
    ///
    /// # Errors
    /// `HarnessErr::InvalidConfig` if `config` doesn't validate.
    pub fn new<F: SolverFactory + 'static>(
        registry: ModelRegistry,
        factory: F,
        config: HarnessConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            registry,
            factory: Box::new(factory),
            config,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// The estimated peak bytes of evaluating `spec`, `None` if its model is unknown.
    pub fn footprint(&self, spec: &TrialSpec) -> Option<u64> {
        let model = self.registry.lookup(&spec.model).ok()?;
        Some(model.footprint(spec.sample_size, spec.dim))
    }

    /// Runs one trial.
    ///
    /// The fixed solvers come first in the result, then the swept ones, each group in its
    /// configured order.
    ///
    /// # Errors
    /// The trial is aborted, without partial results, if the model is unknown, its parameters
    /// are invalid, generation fails or a solver fails in a way that isn't tolerated.
    pub fn task(&self, spec: &TrialSpec) -> Result<Vec<SolverResult>> {
        let model = self.registry.lookup(&spec.model)?;
        spec.validate()?;

        let start = Instant::now();
        let (true_params, data) = model
            .generate(spec.sample_size, spec.dim, spec.sparsity_level, spec.seed)
            .map_err(|source| HarnessErr::Generation {
                model: spec.model.clone(),
                source,
            })?;
        debug!(
            "generated data for {} in {:.4}s",
            spec.model,
            start.elapsed().as_secs_f64()
        );

        let true_support = Support::of(true_params.view());
        let objective = BoundLoss::new(model, &data);
        let ctx = TrialContext {
            objective: &objective,
            true_support: &true_support,
            factory: self.factory.as_ref(),
            dim: spec.dim,
            sparsity_level: spec.sparsity_level,
        };

        let mut results = FixedRunner::new(&self.config.fixed_solvers).run(&ctx)?;
        let swept =
            SweptRunner::new(&self.config.swept_solvers, &self.config.step_sizes).run(&ctx)?;
        results.extend(swept);

        info!(
            model = spec.model.as_str(),
            seed = spec.seed;
            "trial finished with {} results in {:.4}s",
            results.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(results)
    }
}

/// Runs one trial on `harness`, positional form of `Harness::task`.
pub fn task(
    harness: &Harness,
    model: &str,
    sample_size: usize,
    dim: usize,
    sparsity_level: usize,
    seed: u64,
) -> Result<Vec<SolverResult>> {
    harness.task(&TrialSpec::new(model, sample_size, dim, sparsity_level, seed))
}
