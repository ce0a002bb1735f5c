mod generate;
mod ising;
mod linear;
mod link;
mod logistic;
mod non_linear;
mod robust;
mod trend_filter;

use harness::ModelRegistry;

pub use ising::Ising;
pub use linear::Linear;
pub use logistic::Logistic;
pub use non_linear::NonLinear;
pub use robust::RobustEsl;
pub use trend_filter::TrendFilter;

/// A registry holding every model of this crate.
pub fn registry() -> ModelRegistry {
    ModelRegistry::new()
        .with(Linear::new())
        .with(Logistic::new())
        .with(Ising::new())
        .with(NonLinear::new())
        .with(TrendFilter::new())
        .with(RobustEsl::new())
        .alias("robust_esl", "robust_ESL")
}
