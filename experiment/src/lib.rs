//! Runs a grid of support recovery trials in parallel and saves the collected records.

pub mod config;
mod error;
pub mod experiment;
pub mod grid;
mod memory;
mod record;

pub use config::ExperimentConfig;
pub use error::{ExperimentErr, Result};
pub use experiment::ParallelExperiment;
pub use grid::{GridGroup, para_generator};
pub use record::Record;
