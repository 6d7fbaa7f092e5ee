use bevy_ecs::prelude::World;

use crate::clock::SimulationClock;
use crate::ecs::{RunFault, SimRng};
use crate::error::ConfigError;
use crate::profiling::EventMetrics;
use crate::scenario::params::{EdConfig, PatientSource};
use crate::station::StationRegistry;
use crate::telemetry::SimTelemetry;

/// Validate `config` and install every resource a run needs into `world`.
///
/// Stations are attached fresh, so the world starts with empty queues and logs.
/// With `seed` the run is reproducible; without it a seed is drawn from entropy
/// and can be read back from [SimRng::seed].
pub fn build_scenario(
    world: &mut World,
    config: &EdConfig,
    seed: Option<u64>,
) -> Result<(), ConfigError> {
    let tracks = config.validate()?;
    let stations = StationRegistry::attach_all(&config.stations)?;
    let source = PatientSource::new(&config.patient_source)?;
    let rng = match seed {
        Some(seed) => SimRng::seeded(seed),
        None => SimRng::from_entropy(),
    };

    log::debug!(
        "building scenario: {} stations, {} main labs, {} fast-track labs, seed {}",
        stations.len(),
        tracks.main.labs.len(),
        tracks.fast_track.labs.len(),
        rng.seed()
    );

    world.insert_resource(SimulationClock::default());
    world.insert_resource(stations);
    world.insert_resource(tracks);
    world.insert_resource(source);
    world.insert_resource(rng);
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(RunFault::default());
    world.insert_resource(EventMetrics::default());
    Ok(())
}
