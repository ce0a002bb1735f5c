use std::{error::Error, fmt};

use crate::{model::ModelErr, solver::SolveErr, solver::SolverKind};

/// The result type used across the harness.
pub type Result<T> = std::result::Result<T, HarnessErr>;

/// Everything that can abort a trial evaluation.
#[derive(Debug)]
pub enum HarnessErr {
    /// The requested model identifier is not registered.
    UnknownModel(String),
    /// The trial parameters break the `TrialSpec` contract.
    InvalidTrial(String),
    /// The harness configuration was rejected at construction.
    InvalidConfig(String),
    /// The model's data generator failed.
    Generation { model: String, source: ModelErr },
    /// A fixed-configuration solver failed, the whole trial is lost.
    FixedSolverFailure {
        method: SolverKind,
        source: SolveErr,
    },
    /// A swept solver failed in a way that is not a numerical failure.
    SweptSolverFailure {
        method: SolverKind,
        step_size: f64,
        source: SolveErr,
    },
}

impl fmt::Display for HarnessErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownModel(name) => write!(f, "unknown model: {name}"),
            Self::InvalidTrial(msg) => write!(f, "invalid trial: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Generation { model, source } => {
                write!(f, "data generation failed for model {model}: {source}")
            }
            Self::FixedSolverFailure { method, source } => {
                write!(f, "solver {method} failed: {source}")
            }
            Self::SweptSolverFailure {
                method,
                step_size,
                source,
            } => write!(
                f,
                "solver {method} failed with step size {step_size}: {source}"
            ),
        }
    }
}

impl Error for HarnessErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generation { source, .. } => Some(source),
            Self::FixedSolverFailure { source, .. } | Self::SweptSolverFailure { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
