mod fixed;
mod swept;

pub use fixed::FixedRunner;
pub use swept::SweptRunner;

use crate::{
    model::Objective,
    solver::{Solution, SolverFactory, SolverParams},
    support::Support,
};

/// The per trial state both runners read: the bound loss, the ground truth and the problem
/// size.
pub struct TrialContext<'a> {
    pub objective: &'a dyn Objective,
    pub true_support: &'a Support,
    pub factory: &'a dyn SolverFactory,
    pub dim: usize,
    pub sparsity_level: usize,
}

impl TrialContext<'_> {
    /// The solver configuration shared by every solver of the trial.
    pub fn params(&self) -> SolverParams {
        SolverParams::new(self.dim, self.sparsity_level)
    }

    /// Scores `solution` against the trial's true support.
    pub fn accuracy(&self, solution: &Solution) -> f64 {
        self.true_support
            .accuracy(&solution.support(), self.sparsity_level)
    }
}
