use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use harness::{Harness, TrialSpec};
use log::{error, info, warn};
use rayon::{ThreadPoolBuilder, prelude::*};

use crate::{ExperimentErr, Record, Result, memory};

/// Log progress every this many finished trials.
const PROGRESS_EVERY: usize = 50;

/// Fans trials across a pool of worker threads and keeps their records.
pub struct ParallelExperiment {
    harness: Harness,
    name: String,
    workers: NonZeroUsize,
    memory_limit: f64,
    records: Vec<Record>,
    failed: Vec<TrialSpec>,
}

impl ParallelExperiment {
    /// Returns a new `ParallelExperiment`.
    ///
    /// # Arguments
    /// * `harness` - Evaluates each trial.
    /// * `name` - The run name, the output file is named after it.
    /// * `workers` - The most trials to evaluate at once.
    /// * `memory_limit` - Fraction of the available system memory the running trials may take.
    ///
    /// # Errors
    /// `ExperimentErr::InvalidConfig` if `name` is empty or `memory_limit` isn't in `(0, 1]`.
    pub fn new(
        harness: Harness,
        name: impl Into<String>,
        workers: NonZeroUsize,
        memory_limit: f64,
    ) -> Result<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ExperimentErr::InvalidConfig(
                "the run name can't be empty".to_string(),
            ));
        }

        if !(memory_limit > 0. && memory_limit <= 1.) {
            return Err(ExperimentErr::InvalidConfig(format!(
                "memory_limit ({memory_limit}) must be in (0, 1]"
            )));
        }

        Ok(Self {
            harness,
            name,
            workers,
            memory_limit,
            records: Vec::new(),
            failed: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The records of the last run, in the order of its parameter list.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The trials of the last run that failed, in the order of its parameter list.
    pub fn failed(&self) -> &[TrialSpec] {
        &self.failed
    }

    /// Evaluates every trial in `params`, replacing the records of any previous run.
    ///
    /// A failed trial is logged and skipped, it contributes no records.
    ///
    /// # Errors
    /// `ExperimentErr::ThreadPool` if the worker pool can't be built.
    pub fn run(&mut self, params: &[TrialSpec]) -> Result<&[Record]> {
        let threads = self.concurrency(params);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.get())
            .thread_name(|i| format!("trial-{i}"))
            .build()?;

        let total = params.len();
        info!(
            trials = total,
            threads = threads.get();
            "starting run {}", self.name
        );

        let done = AtomicUsize::new(0);
        let harness = &self.harness;
        let outcomes: Vec<_> = pool.install(|| {
            params
                .par_iter()
                .map(|spec| {
                    let outcome = harness.task(spec);

                    let done = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % PROGRESS_EVERY == 0 || done == total {
                        info!("{done}/{total} trials done");
                    }

                    outcome
                })
                .collect()
        });

        self.records.clear();
        self.failed.clear();

        for (spec, outcome) in params.iter().zip(outcomes) {
            match outcome {
                Ok(results) => self
                    .records
                    .extend(results.iter().map(|result| Record::new(spec, result))),
                Err(e) => {
                    error!(model = spec.model.as_str(), seed = spec.seed; "trial failed: {e}");
                    self.failed.push(spec.clone());
                }
            }
        }

        info!(
            records = self.records.len(),
            failed = self.failed.len();
            "finished run {}", self.name
        );
        Ok(&self.records)
    }

    /// Evaluates a single trial on the calling thread, for ad hoc debugging.
    ///
    /// # Errors
    /// `ExperimentErr::Harness` if the trial fails.
    pub fn check(&self, spec: &TrialSpec) -> Result<Vec<Record>> {
        let results = self.harness.task(spec)?;
        Ok(results
            .iter()
            .map(|result| Record::new(spec, result))
            .collect())
    }

    /// Writes the records of the last run to `<dir>/<name>.json`, creating `dir` if needed.
    ///
    /// # Returns
    /// The path of the written file.
    ///
    /// # Errors
    /// `ExperimentErr::Io` or `ExperimentErr::Json` if the file can't be written.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(format!("{}.json", self.name));
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, &self.records)?;
        writer.flush()?;

        info!("saved {} records to {}", self.records.len(), path.display());
        Ok(path)
    }

    fn concurrency(&self, params: &[TrialSpec]) -> NonZeroUsize {
        let Some(available) = memory::available_memory() else {
            warn!("available memory unknown, running {} workers", self.workers);
            return self.workers;
        };

        let largest = params
            .iter()
            .filter_map(|spec| self.harness.footprint(spec))
            .max();
        let threads = memory::concurrency(largest, self.workers, self.memory_limit, available);
        if threads < self.workers {
            warn!(
                "memory budget fits {threads} concurrent trials, below the {} workers requested",
                self.workers
            );
        }

        threads
    }
}
