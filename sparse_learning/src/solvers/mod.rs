mod foba;
mod grasp;
mod htp;
mod iht;
mod omp;
mod refit;
mod scope;

use harness::{Objective, SolveErr, Solver, SolverFactory, SolverKind, SolverParams};
use ndarray::{Array1, ArrayView1};

pub use foba::Foba;
pub use grasp::Grasp;
pub use htp::Htp;
pub use iht::Iht;
pub use omp::Omp;
pub use scope::Scope;

/// The step size of the thresholding methods when none is configured.
pub const DEFAULT_STEP_SIZE: f64 = 1.;

/// How far above its starting value the objective may climb before the iterates are
/// considered divergent.
const DIVERGENCE_RATIO: f64 = 1e8;

/// Builds the solvers of this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SparseSolvers;

impl SparseSolvers {
    /// Returns a new `SparseSolvers`.
    pub fn new() -> Self {
        Self
    }
}

impl SolverFactory for SparseSolvers {
    fn build(&self, kind: SolverKind, params: &SolverParams) -> Box<dyn Solver> {
        let &SolverParams {
            dim,
            sparsity_level,
            step_size,
        } = params;
        let step_size = step_size.unwrap_or(DEFAULT_STEP_SIZE);

        match kind {
            SolverKind::Scope => Box::new(Scope::new(dim, sparsity_level)),
            SolverKind::Grasp => Box::new(Grasp::new(dim, sparsity_level)),
            SolverKind::Foba => Box::new(Foba::new(dim, sparsity_level)),
            SolverKind::Omp => Box::new(Omp::new(dim, sparsity_level)),
            SolverKind::Iht => Box::new(Iht::new(dim, sparsity_level, step_size)),
            SolverKind::Htp => Box::new(Htp::new(dim, sparsity_level, step_size)),
        }
    }
}

/// Checks a solver configured for `dim` and `sparsity_level` can minimize `objective`.
fn check_problem(
    objective: &dyn Objective,
    dim: usize,
    sparsity_level: usize,
) -> Result<(), SolveErr> {
    if objective.dim() != dim {
        return Err(SolveErr::InvalidInput(format!(
            "the objective has {} parameters, the solver expects {dim}",
            objective.dim()
        )));
    }

    if sparsity_level == 0 || sparsity_level > dim {
        return Err(SolveErr::InvalidInput(format!(
            "sparsity level ({sparsity_level}) must be between 1 and {dim}"
        )));
    }

    Ok(())
}

/// Evaluates `objective`, failing if the value is not finite.
fn finite_value(objective: &dyn Objective, params: ArrayView1<f64>) -> Result<f64, SolveErr> {
    let value = objective.value(params);
    if !value.is_finite() {
        return Err(SolveErr::NonFiniteObjective);
    }

    Ok(value)
}

/// The `k` indices with the largest absolute score, ascending. Ties go to the lowest index.
fn top_k(scores: ArrayView1<f64>, k: usize) -> Vec<usize> {
    top_k_among(scores, 0..scores.len(), k)
}

/// Like `top_k`, only considering `candidates`.
fn top_k_among<I>(scores: ArrayView1<f64>, candidates: I, k: usize) -> Vec<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut order: Vec<_> = candidates.into_iter().collect();
    order.sort_by(|&a, &b| scores[b].abs().total_cmp(&scores[a].abs()));
    order.truncate(k);
    order.sort_unstable();
    order
}

/// Zeroes every entry of `params` outside `support`.
fn restrict(params: &mut Array1<f64>, support: &[usize]) {
    let mut keep = vec![false; params.len()];
    for &j in support {
        keep[j] = true;
    }

    params
        .iter_mut()
        .zip(keep)
        .filter(|(_, keep)| !keep)
        .for_each(|(w, _)| *w = 0.);
}

/// The indices at which `params` is non zero, ascending.
fn nonzero(params: ArrayView1<f64>) -> Vec<usize> {
    params
        .iter()
        .enumerate()
        .filter(|&(_, &w)| w != 0.)
        .map(|(j, _)| j)
        .collect()
}
