use experiment::{ExperimentConfig, ExperimentErr, GridGroup, ParallelExperiment, para_generator};
use harness::{Harness, TrialSpec};
use log::info;
use sparse_learning::{SparseSolvers, registry};

/// The trial evaluated when `CHECK` is set.
fn check_spec() -> TrialSpec {
    TrialSpec::new("robust_ESL", 600, 500, 50, 900)
}

fn groups() -> Vec<GridGroup> {
    vec![
        GridGroup::new(["robust_ESL"], [600], [500], [50]),
        GridGroup::new(["non_linear"], [600], [50], [10]),
        GridGroup::new(["trend_filter"], [600], [600], [50]),
        GridGroup::new(["linear", "logistic"], [600], [500], [50]),
        GridGroup::new(["ising"], [600], [190], [40]),
    ]
}

fn main() -> Result<(), ExperimentErr> {
    env_logger::init();

    let config = ExperimentConfig::from_env()?;
    let harness = Harness::new(registry(), SparseSolvers::new(), config.harness.clone())?;
    let mut experiment =
        ParallelExperiment::new(harness, &config.name, config.workers, config.memory_limit)?;

    if config.check {
        let spec = check_spec();
        info!("checking {spec:?}");

        for record in experiment.check(&spec)? {
            println!("{}", serde_json::to_string(&record)?);
        }
        return Ok(());
    }

    let params = para_generator(&groups(), config.repeat, config.seed);
    experiment.run(&params)?;
    experiment.save(&config.out_dir)?;

    Ok(())
}
