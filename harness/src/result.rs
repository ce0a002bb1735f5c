use serde::Serialize;

use crate::solver::SolverKind;

/// How a solver's contribution to a trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    /// The solver produced a support.
    Recovered {
        accuracy: f64,
        /// The objective value of the retained attempt.
        objective: f64,
        /// The retained step size, only for swept solvers.
        step_size: Option<f64>,
    },
    /// Every step size of a swept solver failed numerically.
    NoFeasibleStepSize,
}

/// The record a trial emits per solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolverResult {
    pub method: SolverKind,
    /// Elapsed wall clock seconds.
    pub time: f64,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl SolverResult {
    pub fn recovered(method: SolverKind, time: f64, accuracy: f64, objective: f64) -> Self {
        Self {
            method,
            time,
            outcome: Outcome::Recovered {
                accuracy,
                objective,
                step_size: None,
            },
        }
    }

    pub fn infeasible(method: SolverKind, time: f64) -> Self {
        Self {
            method,
            time,
            outcome: Outcome::NoFeasibleStepSize,
        }
    }

    /// The recovered fraction of the true support, `None` if nothing was recovered.
    pub fn accuracy(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Recovered { accuracy, .. } => Some(accuracy),
            Outcome::NoFeasibleStepSize => None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self.outcome, Outcome::Recovered { .. })
    }
}
