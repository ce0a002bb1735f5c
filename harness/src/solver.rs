use std::{collections::BTreeSet, error::Error, fmt};

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::model::Objective;

/// The closed set of support recovery methods the harness knows how to benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SolverKind {
    #[serde(rename = "SCOPE", alias = "scope")]
    Scope,
    #[serde(rename = "GraSP", alias = "grasp")]
    Grasp,
    #[serde(rename = "FoBa", alias = "foba")]
    Foba,
    #[serde(rename = "OMP", alias = "omp")]
    Omp,
    #[serde(rename = "IHT", alias = "iht")]
    Iht,
    #[serde(rename = "HTP", alias = "htp")]
    Htp,
}

impl SolverKind {
    /// The method name reported in results.
    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Scope => "SCOPE",
            SolverKind::Grasp => "GraSP",
            SolverKind::Foba => "FoBa",
            SolverKind::Omp => "OMP",
            SolverKind::Iht => "IHT",
            SolverKind::Htp => "HTP",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to configure a solver for one attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    pub dim: usize,
    pub sparsity_level: usize,
    /// Only set for step size sensitive solvers.
    pub step_size: Option<f64>,
}

impl SolverParams {
    pub fn new(dim: usize, sparsity_level: usize) -> Self {
        Self {
            dim,
            sparsity_level,
            step_size: None,
        }
    }

    pub fn with_step_size(self, step_size: f64) -> Self {
        Self {
            step_size: Some(step_size),
            ..self
        }
    }
}

/// What a successful solve leaves behind.
#[derive(Debug, Clone)]
pub struct Solution {
    pub params: Array1<f64>,
    /// The objective at `params`.
    pub objective_value: f64,
}

impl Solution {
    pub fn new(params: Array1<f64>, objective_value: f64) -> Self {
        Self {
            params,
            objective_value,
        }
    }

    /// The indices at which the recovered parameters are non zero.
    pub fn support(&self) -> BTreeSet<usize> {
        self.params
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w != 0.)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Why a solve did not produce a `Solution`.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveErr {
    /// The iterates blew up at `iteration`.
    Diverged { iteration: usize },
    /// The objective evaluated to NaN or infinity.
    NonFiniteObjective,
    /// The solver was handed something it can't work with.
    InvalidInput(String),
}

impl SolveErr {
    /// Whether this is an expected numerical failure, the kind a step size sweep may skip.
    pub fn is_numerical(&self) -> bool {
        matches!(self, SolveErr::Diverged { .. } | SolveErr::NonFiniteObjective)
    }
}

impl fmt::Display for SolveErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveErr::Diverged { iteration } => write!(f, "diverged at iteration {iteration}"),
            SolveErr::NonFiniteObjective => write!(f, "objective is not finite"),
            SolveErr::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl Error for SolveErr {}

/// A sparse support recovery method.
pub trait Solver {
    /// Minimizes `objective` subject to the configured sparsity level.
    ///
    /// # Arguments
    /// * `objective` - The loss already bound to the trial's data.
    ///
    /// # Returns
    /// The recovered parameters and their objective value, or why solving failed.
    fn solve(&mut self, objective: &dyn Objective) -> Result<Solution, SolveErr>;
}

/// Builds solvers out of their kind and configuration.
///
/// Implementations should `match` exhaustively on `SolverKind` so a new kind can't be
/// forgotten.
pub trait SolverFactory: Send + Sync {
    fn build(&self, kind: SolverKind, params: &SolverParams) -> Box<dyn Solver>;
}
