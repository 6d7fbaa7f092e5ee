//! Scenario setup: attach stations, resolve tracks and install the patient source.
//!
//! Configuration is validated here, before any simulated time advances. Every
//! call to [build_scenario] attaches fresh stations, so worlds built from the
//! same [EdConfig] never share queues or logs.

mod build;
mod params;

pub use build::build_scenario;
pub use params::{EdConfig, PatientSource, PatientSourceConfig, SimulationEndTime};
