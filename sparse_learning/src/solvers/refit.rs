use harness::{Objective, SolveErr};
use ndarray::Array1;

use super::{DIVERGENCE_RATIO, finite_value, restrict};

/// Sufficient decrease constant of the Armijo condition.
const ARMIJO: f64 = 1e-4;
const MAX_HALVINGS: usize = 40;
const MAX_STEP: f64 = 1e6;
const GRADIENT_TOL: f64 = 1e-8;

#[derive(Debug, Clone, Copy)]
enum StepRule {
    Fixed(f64),
    Backtracking,
}

/// Gradient descent restricted to a support: minimizes the objective over the coordinates in
/// the support while keeping every other coordinate at zero.
#[derive(Debug, Clone, Copy)]
pub struct Refit {
    rule: StepRule,
    max_iter: usize,
    /// Relative decrease of the objective under which the refit stops.
    tol: f64,
}

impl Refit {
    /// A refit that picks its own step with an Armijo line search, it never diverges.
    pub fn backtracking() -> Self {
        Self {
            rule: StepRule::Backtracking,
            max_iter: 100,
            tol: 1e-10,
        }
    }

    /// A refit taking steps of exactly `step_size`, which may diverge when it is too large.
    pub fn fixed(step_size: f64) -> Self {
        Self {
            rule: StepRule::Fixed(step_size),
            max_iter: 100,
            tol: 1e-10,
        }
    }

    /// Refits `params` on `support`, in place.
    ///
    /// # Arguments
    /// * `objective` - The function to minimize.
    /// * `params` - The starting point, overwritten with the result.
    /// * `support` - The coordinates allowed to be non zero.
    ///
    /// # Returns
    /// The objective at the resulting `params`, or a numerical failure.
    pub fn run(
        &self,
        objective: &dyn Objective,
        params: &mut Array1<f64>,
        support: &[usize],
    ) -> Result<f64, SolveErr> {
        restrict(params, support);

        let mut value = finite_value(objective, params.view())?;
        let ceiling = DIVERGENCE_RATIO * value.abs().max(1.);
        let mut step: f64 = 1.;

        for iteration in 0..self.max_iter {
            let grad = objective.gradient(params.view());
            let direction: Vec<f64> = support.iter().map(|&j| grad[j]).collect();
            let sq_norm: f64 = direction.iter().map(|g| g * g).sum();

            if !sq_norm.is_finite() {
                return Err(SolveErr::Diverged { iteration });
            }
            if sq_norm.sqrt() < GRADIENT_TOL {
                break;
            }

            let next = match self.rule {
                StepRule::Fixed(step_size) => {
                    descend(params, support, &direction, step_size);

                    let next = objective.value(params.view());
                    if !next.is_finite() || next > ceiling {
                        return Err(SolveErr::Diverged { iteration });
                    }
                    next
                }
                StepRule::Backtracking => {
                    let origin = params.clone();
                    step = (2. * step).min(MAX_STEP);

                    let mut accepted = None;
                    for _ in 0..MAX_HALVINGS {
                        params.assign(&origin);
                        descend(params, support, &direction, step);

                        let next = objective.value(params.view());
                        if next.is_finite() && next <= value - ARMIJO * step * sq_norm {
                            accepted = Some(next);
                            break;
                        }
                        step /= 2.;
                    }

                    let Some(next) = accepted else {
                        params.assign(&origin);
                        break;
                    };
                    next
                }
            };

            let decrease = value - next;
            value = next;

            if decrease.abs() <= self.tol * value.abs().max(1.) {
                break;
            }
        }

        Ok(value)
    }
}

fn descend(params: &mut Array1<f64>, support: &[usize], direction: &[f64], step: f64) {
    for (&j, g) in support.iter().zip(direction) {
        params[j] -= step * g;
    }
}
