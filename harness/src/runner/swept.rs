use std::time::Instant;

use log::{debug, warn};

use super::TrialContext;
use crate::{
    HarnessErr, Result,
    result::{Outcome, SolverResult},
    solver::SolverKind,
};

/// Runs step size sensitive solvers over a ladder of step sizes, keeping the attempt with the
/// lowest objective.
///
/// Numerical failures of a single attempt are skipped. A solver for which every attempt
/// fails is reported as `Outcome::NoFeasibleStepSize`.
pub struct SweptRunner<'k> {
    kinds: &'k [SolverKind],
    step_sizes: &'k [f64],
}

impl<'k> SweptRunner<'k> {
    /// Returns a new `SweptRunner`.
    ///
    /// # Arguments
    /// * `kinds` - The solvers to sweep.
    /// * `step_sizes` - The step sizes, attempted in this order.
    pub fn new(kinds: &'k [SolverKind], step_sizes: &'k [f64]) -> Self {
        Self { kinds, step_sizes }
    }

    /// Sweeps every solver, in order.
    ///
    /// # Errors
    /// `HarnessErr::SweptSolverFailure` if an attempt fails for a reason other than a
    /// numerical one.
    pub fn run(&self, ctx: &TrialContext<'_>) -> Result<Vec<SolverResult>> {
        self.kinds
            .iter()
            .map(|&method| self.sweep(method, ctx))
            .collect()
    }

    fn sweep(&self, method: SolverKind, ctx: &TrialContext<'_>) -> Result<SolverResult> {
        let start = Instant::now();
        let mut best_objective = f64::INFINITY;
        let mut best = None;

        for &step_size in self.step_sizes {
            let params = ctx.params().with_step_size(step_size);
            let mut solver = ctx.factory.build(method, &params);

            let solution = match solver.solve(ctx.objective) {
                Ok(solution) => solution,
                Err(e) if e.is_numerical() => {
                    debug!("{method} skipped step size {step_size}: {e}");
                    continue;
                }
                Err(source) => {
                    return Err(HarnessErr::SweptSolverFailure {
                        method,
                        step_size,
                        source,
                    });
                }
            };

            let objective = solution.objective_value;
            debug!("{method} step size {step_size} reached objective {objective}");

            if objective < best_objective {
                best_objective = objective;
                best = Some(SolverResult {
                    method,
                    time: start.elapsed().as_secs_f64(),
                    outcome: Outcome::Recovered {
                        accuracy: ctx.accuracy(&solution),
                        objective,
                        step_size: Some(step_size),
                    },
                });
            }
        }

        Ok(best.unwrap_or_else(|| {
            warn!("{method} found no feasible step size");
            SolverResult::infeasible(method, start.elapsed().as_secs_f64())
        }))
    }
}
