use harness::{Objective, SolveErr, Solution, Solver};
use log::trace;
use ndarray::Array1;

use super::{DIVERGENCE_RATIO, check_problem, finite_value, restrict, top_k};

/// Iterative hard thresholding: a gradient step of `step_size` followed by keeping the
/// `sparsity_level` largest entries.
#[derive(Debug, Clone)]
pub struct Iht {
    dim: usize,
    sparsity_level: usize,
    step_size: f64,
    max_iter: usize,
    tol: f64,
}

impl Iht {
    /// Returns a new `Iht`.
    ///
    /// # Arguments
    /// * `dim` - The length of the parameter vector.
    /// * `sparsity_level` - The amount of entries left non zero.
    /// * `step_size` - The length of the gradient steps.
    pub fn new(dim: usize, sparsity_level: usize, step_size: f64) -> Self {
        Self {
            dim,
            sparsity_level,
            step_size,
            max_iter: 300,
            tol: 1e-8,
        }
    }
}

impl Solver for Iht {
    fn solve(&mut self, objective: &dyn Objective) -> Result<Solution, SolveErr> {
        check_problem(objective, self.dim, self.sparsity_level)?;

        let mut params = Array1::zeros(self.dim);
        let mut value = finite_value(objective, params.view())?;
        let ceiling = DIVERGENCE_RATIO * value.abs().max(1.);

        for iteration in 0..self.max_iter {
            let grad = objective.gradient(params.view());
            let mut next = &params - &(grad * self.step_size);

            let support = top_k(next.view(), self.sparsity_level);
            restrict(&mut next, &support);

            value = objective.value(next.view());
            if !value.is_finite() || value > ceiling {
                return Err(SolveErr::Diverged { iteration });
            }

            let change = (&next - &params).fold(0., |acc: f64, d| acc.max(d.abs()));
            let scale = next.fold(1., |acc: f64, w| acc.max(w.abs()));
            params = next;

            if change <= self.tol * scale {
                trace!("iht converged after {iteration} iterations, objective {value}");
                break;
            }
        }

        Ok(Solution::new(params, value))
    }
}
