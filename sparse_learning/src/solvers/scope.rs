use harness::{Objective, SolveErr, Solution, Solver};
use log::trace;
use ndarray::Array1;

use super::{check_problem, refit::Refit, top_k};

/// The largest amount of coordinates exchanged in one splicing step.
const MAX_EXCHANGE: usize = 5;

/// Sparsity constrained optimization by splicing.
///
/// Starts from the support of the largest gradient coordinates, then repeatedly exchanges the
/// least important active coordinates with the most important inactive ones, keeping an
/// exchange only when it lowers the objective.
#[derive(Debug, Clone)]
pub struct Scope {
    dim: usize,
    sparsity_level: usize,
    max_iter: usize,
}

impl Scope {
    /// Returns a new `Scope`.
    pub fn new(dim: usize, sparsity_level: usize) -> Self {
        Self {
            dim,
            sparsity_level,
            max_iter: 20,
        }
    }

    /// Tries exchanges of growing size, returning the first one that improves `value`.
    fn splice(
        &self,
        objective: &dyn Objective,
        refit: &Refit,
        params: &Array1<f64>,
        support: &[usize],
        value: f64,
    ) -> Result<Option<(Array1<f64>, Vec<usize>, f64)>, SolveErr> {
        let grad = objective.gradient(params.view());

        // Active coordinates are worth their squared weight, inactive ones their squared
        // gradient.
        let mut active = support.to_vec();
        active.sort_by(|&a, &b| params[a].abs().total_cmp(&params[b].abs()));

        let mut inactive: Vec<_> = (0..self.dim).filter(|j| !support.contains(j)).collect();
        inactive.sort_by(|&a, &b| grad[b].abs().total_cmp(&grad[a].abs()));

        let max_exchange = MAX_EXCHANGE.min(active.len()).min(inactive.len());
        for size in 1..=max_exchange {
            let mut candidate: Vec<_> = active[size..]
                .iter()
                .chain(&inactive[..size])
                .copied()
                .collect();
            candidate.sort_unstable();

            let mut next = params.clone();
            let next_value = refit.run(objective, &mut next, &candidate)?;

            if next_value < value - 1e-12 * value.abs().max(1.) {
                return Ok(Some((next, candidate, next_value)));
            }
        }

        Ok(None)
    }
}

impl Solver for Scope {
    fn solve(&mut self, objective: &dyn Objective) -> Result<Solution, SolveErr> {
        check_problem(objective, self.dim, self.sparsity_level)?;

        let refit = Refit::backtracking();
        let mut params = Array1::zeros(self.dim);

        let grad = objective.gradient(params.view());
        let mut support = top_k(grad.view(), self.sparsity_level);
        let mut value = refit.run(objective, &mut params, &support)?;

        for iteration in 0..self.max_iter {
            let Some((next, next_support, next_value)) =
                self.splice(objective, &refit, &params, &support, value)?
            else {
                trace!("scope stopped splicing after {iteration} iterations, objective {value}");
                break;
            };

            params = next;
            support = next_support;
            value = next_value;
        }

        Ok(Solution::new(params, value))
    }
}
