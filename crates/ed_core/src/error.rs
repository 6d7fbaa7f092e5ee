//! Error types for scenario configuration and simulation runs.
//!
//! Configuration errors are raised before any simulated time advances; run
//! errors abort a replication without returning partial logs.

use std::fmt;

/// A rejected configuration value. Every variant names the offending field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Station capacity must be a positive number of servers.
    InvalidCapacity { station: String, capacity: usize },
    /// Probabilities must lie in `[0, 1]`.
    InvalidProbability { field: String, value: f64 },
    /// Distribution kind not recognised (only `Exponential`, `Normal`, `Uniform`).
    UnknownDistribution { field: String, kind: String },
    /// A distribution was declared without one of its parameters.
    MissingParameter { field: String, parameter: &'static str },
    /// A distribution parameter is outside its valid range.
    InvalidParameter {
        field: String,
        parameter: &'static str,
        value: f64,
    },
    DuplicateStation { name: String },
    /// A track references a station that is not in the configuration.
    UnknownStation { track: String, station: String },
    EmptyLabSequence { track: String },
    /// Only the main track may route patients to a bed.
    FastTrackBed { station: String },
    /// Run-level parameter (horizon, burn-in, replications, ...) rejected.
    InvalidRun { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCapacity { station, capacity } => write!(
                f,
                "station '{station}': capacity must be at least 1 (got {capacity})"
            ),
            ConfigError::InvalidProbability { field, value } => {
                write!(f, "{field}: probability must be in [0, 1] (got {value})")
            }
            ConfigError::UnknownDistribution { field, kind } => {
                write!(f, "{field}: unknown distribution kind '{kind}'")
            }
            ConfigError::MissingParameter { field, parameter } => {
                write!(f, "{field}: missing distribution parameter '{parameter}'")
            }
            ConfigError::InvalidParameter {
                field,
                parameter,
                value,
            } => write!(f, "{field}: invalid value {value} for parameter '{parameter}'"),
            ConfigError::DuplicateStation { name } => {
                write!(f, "station name '{name}' is used more than once")
            }
            ConfigError::UnknownStation { track, station } => {
                write!(f, "{track} track references unknown station '{station}'")
            }
            ConfigError::EmptyLabSequence { track } => {
                write!(f, "{track} track must have at least one lab")
            }
            ConfigError::FastTrackBed { station } => write!(
                f,
                "fast track cannot route patients to bed station '{station}'"
            ),
            ConfigError::InvalidRun { field, reason } => write!(f, "{field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that abort a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    Config(ConfigError),
    /// A routing process asked for a station that is not attached to the run.
    UnboundStation { station: usize },
    /// An event referenced a patient entity that no longer exists.
    UnknownPatient { entity: String },
    /// A station released a server while none were busy.
    ReleaseWithoutGrant { station: String },
    /// A service completed for a patient whose routing state has no station.
    NotAtStation { patient: u64 },
    /// The world is missing a resource installed by the scenario builder.
    MissingResource(&'static str),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(err) => write!(f, "invalid configuration: {err}"),
            SimError::UnboundStation { station } => write!(
                f,
                "station #{station} is not attached to the running simulation"
            ),
            SimError::UnknownPatient { entity } => {
                write!(f, "event references unknown patient entity {entity}")
            }
            SimError::ReleaseWithoutGrant { station } => {
                write!(f, "station '{station}' released a server that was not busy")
            }
            SimError::NotAtStation { patient } => {
                write!(f, "patient {patient} completed service while not at a station")
            }
            SimError::MissingResource(name) => {
                write!(f, "simulation world is missing resource {name}")
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Config(err)
    }
}
