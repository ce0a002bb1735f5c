use harness::{Objective, SolveErr, Solution, Solver};
use ndarray::Array1;

use super::{check_problem, nonzero, refit::Refit, restrict, top_k};

/// Gradient support pursuit: merges the `2 * sparsity_level` largest gradient coordinates
/// with the current support, refits on the union and prunes back to the sparsity level.
#[derive(Debug, Clone)]
pub struct Grasp {
    dim: usize,
    sparsity_level: usize,
    max_iter: usize,
}

impl Grasp {
    /// Returns a new `Grasp`.
    pub fn new(dim: usize, sparsity_level: usize) -> Self {
        Self {
            dim,
            sparsity_level,
            max_iter: 20,
        }
    }
}

impl Solver for Grasp {
    fn solve(&mut self, objective: &dyn Objective) -> Result<Solution, SolveErr> {
        check_problem(objective, self.dim, self.sparsity_level)?;

        let refit = Refit::backtracking();
        let explore = (2 * self.sparsity_level).min(self.dim);
        let mut params = Array1::zeros(self.dim);
        let mut support = Vec::new();

        for _ in 0..self.max_iter {
            let grad = objective.gradient(params.view());

            let mut merged = top_k(grad.view(), explore);
            merged.extend(nonzero(params.view()));
            merged.sort_unstable();
            merged.dedup();

            let mut candidate = params.clone();
            refit.run(objective, &mut candidate, &merged)?;

            let pruned = top_k(candidate.view(), self.sparsity_level);
            restrict(&mut candidate, &pruned);
            params = candidate;

            if pruned == support {
                break;
            }
            support = pruned;
        }

        let value = refit.run(objective, &mut params, &support)?;
        Ok(Solution::new(params, value))
    }
}
