use std::time::Instant;

use log::debug;

use super::TrialContext;
use crate::{HarnessErr, Result, result::SolverResult, solver::SolverKind};

/// Runs solvers whose configuration is fully determined by the problem size, once each.
///
/// The first failing solver aborts the whole run, partial results are never returned.
pub struct FixedRunner<'k> {
    kinds: &'k [SolverKind],
}

impl<'k> FixedRunner<'k> {
    pub fn new(kinds: &'k [SolverKind]) -> Self {
        Self { kinds }
    }

    /// Solves the trial with every solver, in order.
    ///
    /// # Errors
    /// `HarnessErr::FixedSolverFailure` for the first solver that fails.
    pub fn run(&self, ctx: &TrialContext<'_>) -> Result<Vec<SolverResult>> {
        let params = ctx.params();

        self.kinds
            .iter()
            .map(|&method| {
                let mut solver = ctx.factory.build(method, &params);

                let start = Instant::now();
                let solution = solver
                    .solve(ctx.objective)
                    .map_err(|source| HarnessErr::FixedSolverFailure { method, source })?;
                let time = start.elapsed().as_secs_f64();

                let accuracy = ctx.accuracy(&solution);
                debug!("{method} finished in {time:.4}s with accuracy {accuracy}");

                Ok(SolverResult::recovered(
                    method,
                    time,
                    accuracy,
                    solution.objective_value,
                ))
            })
            .collect()
    }
}
