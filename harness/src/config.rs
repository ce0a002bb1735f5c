use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{HarnessErr, Result, solver::SolverKind};

/// The step sizes swept by default, largest first.
pub const DEFAULT_STEP_SIZES: [f64; 5] = [1.0, 0.1, 0.01, 0.001, 0.0001];

/// The solver sets and step size ladder of a harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct HarnessConfig {
    /// Tried in this exact order for every swept solver.
    pub step_sizes: Vec<f64>,
    /// Solvers whose configuration is fully determined by the problem size, run once.
    pub fixed_solvers: Vec<SolverKind>,
    /// Solvers sensitive to the step size, swept over `step_sizes`.
    pub swept_solvers: Vec<SolverKind>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            step_sizes: DEFAULT_STEP_SIZES.to_vec(),
            fixed_solvers: vec![
                SolverKind::Scope,
                SolverKind::Grasp,
                SolverKind::Foba,
                SolverKind::Omp,
            ],
            swept_solvers: vec![SolverKind::Iht, SolverKind::Htp],
        }
    }
}

impl HarnessConfig {
    /// The amount of results a successful trial yields.
    pub fn nsolvers(&self) -> usize {
        self.fixed_solvers.len() + self.swept_solvers.len()
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    /// `HarnessErr::InvalidConfig` if there are no solvers, a solver appears more than once,
    /// there are swept solvers but no step sizes, or a step size isn't positive and finite.
    pub fn validate(&self) -> Result<()> {
        if self.nsolvers() == 0 {
            return Err(HarnessErr::InvalidConfig(
                "at least one solver is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for kind in self.fixed_solvers.iter().chain(&self.swept_solvers) {
            if !seen.insert(kind) {
                return Err(HarnessErr::InvalidConfig(format!(
                    "solver {kind} is configured more than once"
                )));
            }
        }

        if !self.swept_solvers.is_empty() && self.step_sizes.is_empty() {
            return Err(HarnessErr::InvalidConfig(
                "swept solvers need at least one step size".into(),
            ));
        }

        if let Some(step_size) = self
            .step_sizes
            .iter()
            .find(|s| !s.is_finite() || **s <= 0.)
        {
            return Err(HarnessErr::InvalidConfig(format!(
                "step size ({step_size}) must be positive and finite"
            )));
        }

        Ok(())
    }
}
