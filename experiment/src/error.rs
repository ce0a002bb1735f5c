use std::{error::Error, fmt, io};

use harness::HarnessErr;
use rayon::ThreadPoolBuildError;

/// The experiment driver's result type.
pub type Result<T> = std::result::Result<T, ExperimentErr>;

/// Failures of the experiment driver. Failed trials during a run are logged and skipped,
/// they only surface here through `check`.
#[derive(Debug)]
pub enum ExperimentErr {
    /// Invalid configuration, caught before running anything.
    InvalidConfig(String),
    /// A trial or the harness itself failed.
    Harness(HarnessErr),
    /// The worker pool could not be built.
    ThreadPool(ThreadPoolBuildError),
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ExperimentErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Harness(e) => write!(f, "harness error: {e}"),
            Self::ThreadPool(e) => write!(f, "thread pool error: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for ExperimentErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Harness(e) => Some(e),
            Self::ThreadPool(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<HarnessErr> for ExperimentErr {
    fn from(value: HarnessErr) -> Self {
        Self::Harness(value)
    }
}

impl From<ThreadPoolBuildError> for ExperimentErr {
    fn from(value: ThreadPoolBuildError) -> Self {
        Self::ThreadPool(value)
    }
}

impl From<io::Error> for ExperimentErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ExperimentErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
