use harness::{SolverKind, SolverResult, TrialSpec};
use serde::{Deserialize, Serialize};

/// One saved row: the trial's inputs followed by one solver's outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub model: String,
    pub sample_size: usize,
    pub dim: usize,
    pub sparsity_level: usize,
    pub seed: u64,
    pub method: SolverKind,
    /// Elapsed wall clock seconds.
    pub time: f64,
    /// `None` when a swept solver had no feasible step size.
    pub accuracy: Option<f64>,
}

impl Record {
    pub fn new(spec: &TrialSpec, result: &SolverResult) -> Self {
        Self {
            model: spec.model.clone(),
            sample_size: spec.sample_size,
            dim: spec.dim,
            sparsity_level: spec.sparsity_level,
            seed: spec.seed,
            method: result.method,
            time: result.time,
            accuracy: result.accuracy(),
        }
    }
}
