use std::fmt;

use ed_core::{ConfigError, SimError};

/// Errors that stop an analysis before it produces results.
///
/// A station failing the tolerance check is not an error; it is reported in
/// [crate::stats::StationSummary::all_within_tolerance].
#[derive(Debug)]
pub enum AnalysisError {
    Config(ConfigError),
    /// One replication aborted; no partial batch is returned.
    Replication {
        index: usize,
        seed: u64,
        source: SimError,
    },
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Config(err) => write!(f, "invalid analysis configuration: {err}"),
            AnalysisError::Replication {
                index,
                seed,
                source,
            } => write!(f, "replication {index} (seed {seed}) failed: {source}"),
            AnalysisError::ThreadPool(err) => write!(f, "failed to create thread pool: {err}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Config(err) => Some(err),
            AnalysisError::Replication { source, .. } => Some(source),
            AnalysisError::ThreadPool(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(err: ConfigError) -> Self {
        AnalysisError::Config(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for AnalysisError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        AnalysisError::ThreadPool(err)
    }
}
