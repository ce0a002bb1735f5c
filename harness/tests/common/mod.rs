#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use harness::{
    Dataset, Model, ModelErr, ModelRegistry, Objective, SolveErr, Solution, Solver,
    SolverFactory, SolverKind, SolverParams,
};
use ndarray::{Array1, Array2, ArrayView1};

/// A model whose true support is always the first `sparsity_level` indices.
pub struct Planted;

impl Model for Planted {
    fn name(&self) -> &str {
        "planted"
    }

    fn generate(
        &self,
        _sample_size: usize,
        dim: usize,
        sparsity_level: usize,
        _seed: u64,
    ) -> Result<(Array1<f64>, Dataset), ModelErr> {
        let truth = Array1::from_shape_fn(dim, |i| if i < sparsity_level { 1. } else { 0. });
        let data = Dataset::new(Array2::eye(dim), truth.clone());
        Ok((truth, data))
    }

    fn loss(&self, params: ArrayView1<f64>, data: &Dataset) -> f64 {
        let r = &data.y - &data.x.dot(&params);
        0.5 * r.dot(&r)
    }

    fn gradient(&self, params: ArrayView1<f64>, data: &Dataset) -> Array1<f64> {
        let r = &data.x.dot(&params) - &data.y;
        data.x.t().dot(&r)
    }
}

pub fn registry() -> ModelRegistry {
    ModelRegistry::new().with(Planted)
}

/// Parameters hitting the first `hits` entries of the planted support, and missing the rest.
pub fn guess(params: &SolverParams, hits: usize) -> Array1<f64> {
    let mut guess = Array1::zeros(params.dim);
    for i in 0..hits {
        guess[i] = 1.;
    }
    for i in hits..params.sparsity_level {
        guess[params.dim - 1 - i] = 1.;
    }
    guess
}

type Script = dyn Fn(SolverKind, &SolverParams) -> Result<Solution, SolveErr> + Send + Sync;

/// Builds solvers that return whatever the script says, recording every attempt.
#[derive(Clone)]
pub struct Scripted {
    script: Arc<Script>,
    calls: Arc<Mutex<Vec<(SolverKind, Option<f64>)>>>,
}

impl Scripted {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(SolverKind, &SolverParams) -> Result<Solution, SolveErr> + Send + Sync + 'static,
    {
        Self {
            script: Arc::new(script),
            calls: Arc::default(),
        }
    }

    /// Every solver recovers the planted support exactly.
    pub fn perfect() -> Self {
        Self::new(|_, params| Ok(Solution::new(guess(params, params.sparsity_level), 0.)))
    }

    pub fn calls(&self) -> Vec<(SolverKind, Option<f64>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SolverFactory for Scripted {
    fn build(&self, kind: SolverKind, params: &SolverParams) -> Box<dyn Solver> {
        Box::new(ScriptedSolver {
            kind,
            params: *params,
            factory: self.clone(),
        })
    }
}

struct ScriptedSolver {
    kind: SolverKind,
    params: SolverParams,
    factory: Scripted,
}

impl Solver for ScriptedSolver {
    fn solve(&mut self, _objective: &dyn Objective) -> Result<Solution, SolveErr> {
        self.factory
            .calls
            .lock()
            .unwrap()
            .push((self.kind, self.params.step_size));

        (self.factory.script)(self.kind, &self.params)
    }
}
