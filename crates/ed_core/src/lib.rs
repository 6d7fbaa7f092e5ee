//! Discrete-event simulation of an emergency department.
//!
//! Patients arrive at random intervals, are routed to the main track or the
//! fast track, and queue for service at labs, a doctor's room and (main track
//! only) a bed. Every station logs its queue length and busy servers over
//! simulated time; [ed_analysis](../ed_analysis/index.html) turns those logs
//! into steady-state estimates.
//!
//! The engine is built on `bevy_ecs`: the clock, stations and random stream are
//! resources, patients are entities, and each event kind is handled by one
//! system. [EmergencyDepartment] wraps a world for a single replication.

pub mod clock;
pub mod distributions;
pub mod ecs;
pub mod emergency_department;
pub mod error;
pub mod profiling;
pub mod routing;
pub mod runner;
pub mod scenario;
pub mod station;
pub mod systems;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use clock::SimTime;
pub use distributions::DurationDistribution;
pub use emergency_department::EmergencyDepartment;
pub use error::{ConfigError, SimError};
pub use routing::{BedPolicy, TrackConfig, TrackKind};
pub use scenario::{EdConfig, PatientSourceConfig};
pub use station::StationConfig;
pub use telemetry::{CompletedPatientRecord, RunLogs, StationSample};
