use std::{
    env,
    fmt::Display,
    fs::File,
    io::BufReader,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
};

use harness::HarnessConfig;

use crate::{ExperimentErr, Result};

const DEFAULT_NAME: &str = "support_recovery";
const DEFAULT_WORKERS: NonZeroUsize = NonZeroUsize::new(8).unwrap();
const DEFAULT_REPEAT: NonZeroUsize = NonZeroUsize::new(100).unwrap();
const DEFAULT_MEMORY_LIMIT: f64 = 0.8;

/// Process level settings of an experiment run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Names the output file.
    pub name: String,
    pub workers: NonZeroUsize,
    /// Seeds per grid combination.
    pub repeat: NonZeroUsize,
    /// The base seed the trial seeds are drawn from.
    pub seed: u64,
    /// Fraction of the available system memory the running trials may take.
    pub memory_limit: f64,
    pub out_dir: PathBuf,
    pub harness: HarnessConfig,
    /// Run a single trial and print its records instead of the whole grid.
    pub check: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            workers: DEFAULT_WORKERS,
            repeat: DEFAULT_REPEAT,
            seed: 0,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            out_dir: PathBuf::from("."),
            harness: HarnessConfig::default(),
            check: false,
        }
    }
}

impl ExperimentConfig {
    /// Reads the config from the process environment.
    ///
    /// # Errors
    /// See `from_lookup`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the config from the variables `lookup` resolves, defaulting the missing ones.
    ///
    /// Variables: `RUN_NAME`, `WORKERS`, `REPEAT`, `SEED`, `MEMORY_LIMIT`, `OUT_DIR`,
    /// `HARNESS_CONFIG` (path to a json `HarnessConfig`) and `CHECK`.
    ///
    /// # Errors
    /// `ExperimentErr::InvalidConfig` if a variable doesn't parse or the result doesn't
    /// validate, `Io` or `Json` if the harness config file can't be read.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup("RUN_NAME") {
            config.name = name;
        }
        if let Some(workers) = parse(&lookup, "WORKERS")? {
            config.workers = workers;
        }
        if let Some(repeat) = parse(&lookup, "REPEAT")? {
            config.repeat = repeat;
        }
        if let Some(seed) = parse(&lookup, "SEED")? {
            config.seed = seed;
        }
        if let Some(memory_limit) = parse(&lookup, "MEMORY_LIMIT")? {
            config.memory_limit = memory_limit;
        }
        if let Some(out_dir) = lookup("OUT_DIR") {
            config.out_dir = PathBuf::from(out_dir);
        }
        if let Some(path) = lookup("HARNESS_CONFIG") {
            config.harness = read_harness_config(path)?;
        }
        if let Some(check) = lookup("CHECK") {
            config.check = matches!(check.trim(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// `ExperimentErr::InvalidConfig` if the name is empty, the memory limit is outside
    /// `(0, 1]` or the harness config is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ExperimentErr::InvalidConfig(
                "the run name can't be empty".to_string(),
            ));
        }

        if !(self.memory_limit > 0. && self.memory_limit <= 1.) {
            return Err(ExperimentErr::InvalidConfig(format!(
                "memory_limit ({}) must be in (0, 1]",
                self.memory_limit
            )));
        }

        self.harness.validate()?;
        Ok(())
    }
}

fn parse<T, F>(lookup: &F, var: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| ExperimentErr::InvalidConfig(format!("{var}={raw}: {e}")))
}

/// Reads a json `HarnessConfig` from `path`.
pub fn read_harness_config<P: AsRef<Path>>(path: P) -> Result<HarnessConfig> {
    let reader = BufReader::new(File::open(path)?);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}
