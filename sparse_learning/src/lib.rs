pub mod models;
pub mod solvers;

pub use models::registry;
pub use solvers::SparseSolvers;
