pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod result;
pub mod runner;
pub mod solver;
pub mod support;
pub mod trial;

pub use config::HarnessConfig;
pub use error::{HarnessErr, Result};
pub use model::{BoundLoss, Dataset, Model, ModelErr, Objective};
pub use registry::ModelRegistry;
pub use result::{Outcome, SolverResult};
pub use solver::{SolveErr, Solution, Solver, SolverFactory, SolverKind, SolverParams};
pub use support::Support;
pub use trial::{Harness, TrialSpec, task};
