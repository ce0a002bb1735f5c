use harness::{Objective, SolveErr, Solution, Solver};
use ndarray::Array1;

use super::{check_problem, refit::Refit, top_k};

/// Hard thresholding pursuit: like iterative hard thresholding, but every selected support
/// is refitted with gradient steps of `step_size` before the next selection.
#[derive(Debug, Clone)]
pub struct Htp {
    dim: usize,
    sparsity_level: usize,
    step_size: f64,
    max_iter: usize,
}

impl Htp {
    /// Returns a new `Htp`.
    ///
    /// # Arguments
    /// * `dim` - The length of the parameter vector.
    /// * `sparsity_level` - The amount of entries left non zero.
    /// * `step_size` - The length of the gradient steps, both for selection and refitting.
    pub fn new(dim: usize, sparsity_level: usize, step_size: f64) -> Self {
        Self {
            dim,
            sparsity_level,
            step_size,
            max_iter: 20,
        }
    }
}

impl Solver for Htp {
    fn solve(&mut self, objective: &dyn Objective) -> Result<Solution, SolveErr> {
        check_problem(objective, self.dim, self.sparsity_level)?;

        let refit = Refit::fixed(self.step_size);
        let mut params = Array1::zeros(self.dim);
        let mut support = Vec::new();
        let mut value = objective.value(params.view());

        for _ in 0..self.max_iter {
            let grad = objective.gradient(params.view());
            let mut next = &params - &(grad * self.step_size);

            let next_support = top_k(next.view(), self.sparsity_level);
            if next_support == support {
                break;
            }

            value = refit.run(objective, &mut next, &next_support)?;
            params = next;
            support = next_support;
        }

        if !value.is_finite() {
            return Err(SolveErr::NonFiniteObjective);
        }

        Ok(Solution::new(params, value))
    }
}
