use harness::{Objective, SolveErr, Solution, Solver};
use ndarray::Array1;

use super::{check_problem, refit::Refit, top_k_among};

/// Orthogonal matching pursuit: greedily adds the coordinate with the largest gradient and
/// refits on the grown support, until the support reaches the sparsity level.
#[derive(Debug, Clone)]
pub struct Omp {
    dim: usize,
    sparsity_level: usize,
}

impl Omp {
    /// Returns a new `Omp`.
    pub fn new(dim: usize, sparsity_level: usize) -> Self {
        Self {
            dim,
            sparsity_level,
        }
    }
}

impl Solver for Omp {
    fn solve(&mut self, objective: &dyn Objective) -> Result<Solution, SolveErr> {
        check_problem(objective, self.dim, self.sparsity_level)?;

        let refit = Refit::backtracking();
        let mut params = Array1::zeros(self.dim);
        let mut support: Vec<usize> = Vec::with_capacity(self.sparsity_level);
        let mut value = objective.value(params.view());

        while support.len() < self.sparsity_level {
            let grad = objective.gradient(params.view());
            let inactive = (0..self.dim).filter(|j| !support.contains(j));
            let Some(&best) = top_k_among(grad.view(), inactive, 1).first() else {
                break;
            };

            support.push(best);
            value = refit.run(objective, &mut params, &support)?;
        }

        if !value.is_finite() {
            return Err(SolveErr::NonFiniteObjective);
        }

        Ok(Solution::new(params, value))
    }
}
