use harness::{Objective, SolveErr, Solution, Solver};
use ndarray::Array1;

use super::{check_problem, finite_value, refit::Refit, top_k_among};

/// A coordinate is dropped when removing it costs less than this fraction of the last
/// forward gain.
const BACKWARD_RATIO: f64 = 0.5;

/// Forward-backward greedy selection: forward steps add the coordinate with the largest
/// gradient, backward steps drop coordinates that stopped pulling their weight.
#[derive(Debug, Clone)]
pub struct Foba {
    dim: usize,
    sparsity_level: usize,
}

impl Foba {
    /// Returns a new `Foba`.
    pub fn new(dim: usize, sparsity_level: usize) -> Self {
        Self {
            dim,
            sparsity_level,
        }
    }

    fn forward(
        &self,
        objective: &dyn Objective,
        refit: &Refit,
        params: &mut Array1<f64>,
        support: &mut Vec<usize>,
    ) -> Result<f64, SolveErr> {
        let grad = objective.gradient(params.view());
        let inactive = (0..self.dim).filter(|j| !support.contains(j));

        if let Some(&best) = top_k_among(grad.view(), inactive, 1).first() {
            support.push(best);
        }

        refit.run(objective, params, support)
    }

    /// The position in `support` whose removal increases the objective the least, and that
    /// increase.
    fn cheapest_removal(
        &self,
        objective: &dyn Objective,
        params: &Array1<f64>,
        support: &[usize],
        value: f64,
    ) -> Option<(usize, f64)> {
        support
            .iter()
            .enumerate()
            .map(|(pos, &j)| {
                let mut without = params.clone();
                without[j] = 0.;
                (pos, objective.value(without.view()) - value)
            })
            .filter(|(_, cost)| cost.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl Solver for Foba {
    fn solve(&mut self, objective: &dyn Objective) -> Result<Solution, SolveErr> {
        check_problem(objective, self.dim, self.sparsity_level)?;

        let refit = Refit::backtracking();
        let mut params = Array1::zeros(self.dim);
        let mut support = Vec::with_capacity(self.sparsity_level);
        let mut value = finite_value(objective, params.view())?;

        // Backward steps may undo forward ones, the budget keeps the two from cycling.
        let mut budget = 4 * self.sparsity_level;

        while support.len() < self.sparsity_level {
            let next = self.forward(objective, &refit, &mut params, &mut support)?;
            let gain = value - next;
            value = next;

            if budget == 0 {
                continue;
            }
            budget -= 1;

            while support.len() > 1 {
                let Some((pos, cost)) = self.cheapest_removal(objective, &params, &support, value)
                else {
                    break;
                };
                if cost >= BACKWARD_RATIO * gain {
                    break;
                }

                support.remove(pos);
                value = refit.run(objective, &mut params, &support)?;
            }
        }

        Ok(Solution::new(params, value))
    }
}
