//! The emergency department as a runnable unit: one world, one schedule, one replication.

use bevy_ecs::prelude::{Schedule, World};

use crate::clock::{Event, SimTime, SimulationClock};
use crate::ecs::SimRng;
use crate::error::{ConfigError, SimError};
use crate::runner::{initialize_simulation, run_until_with_hook, simulation_schedule};
use crate::scenario::{build_scenario, EdConfig};
use crate::station::StationRegistry;
use crate::telemetry::{RunLogs, SimTelemetry};

/// Owns the clock, the attached stations and the patient arrival stream of one run.
///
/// ```no_run
/// use ed_core::{EdConfig, EmergencyDepartment};
///
/// let mut ed = EmergencyDepartment::new(&EdConfig::default(), Some(42))?;
/// let logs = ed.run(2_000.0)?;
/// println!("{} queue samples", logs.queue_length.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EmergencyDepartment {
    world: World,
    schedule: Schedule,
    started: bool,
}

impl EmergencyDepartment {
    /// Validate `config` and attach a fresh runtime station for each configured one.
    pub fn new(config: &EdConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        let mut world = World::new();
        build_scenario(&mut world, config, seed)?;
        Ok(Self {
            world,
            schedule: simulation_schedule(),
            started: false,
        })
    }

    /// Advance the department until `until` and return the raw station logs.
    ///
    /// Arrivals start at time 0. Patients still in the department at the horizon
    /// are left where they are and produce no completion record. Calling `run`
    /// again with a later horizon continues the same replication.
    pub fn run(&mut self, until: SimTime) -> Result<RunLogs, SimError> {
        self.run_with_hook(until, |_, _| {})
    }

    /// [Self::run], observing the world after every processed event.
    pub fn run_with_hook<F>(&mut self, until: SimTime, hook: F) -> Result<RunLogs, SimError>
    where
        F: FnMut(&World, &Event),
    {
        if !until.is_finite() || until < 0.0 {
            return Err(ConfigError::InvalidRun {
                field: "until",
                reason: format!("horizon must be a finite, non-negative time (got {until})"),
            }
            .into());
        }
        if !self.started {
            initialize_simulation(&mut self.world);
            self.started = true;
        }
        let steps = run_until_with_hook(&mut self.world, &mut self.schedule, until, hook)?;
        log::debug!(
            "seed {}: {} events up to t={until}, {} patients arrived, {} completed",
            self.seed(),
            steps,
            self.telemetry().total_arrivals(),
            self.telemetry().completed_patients.len()
        );
        Ok(self.logs())
    }

    /// Station logs collected so far.
    pub fn logs(&self) -> RunLogs {
        RunLogs::from_registry(self.stations())
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        self.world.resource::<SimTelemetry>()
    }

    pub fn stations(&self) -> &StationRegistry {
        self.world.resource::<StationRegistry>()
    }

    pub fn clock(&self) -> &SimulationClock {
        self.world.resource::<SimulationClock>()
    }

    /// Seed of this replication's random stream.
    pub fn seed(&self) -> u64 {
        self.world.resource::<SimRng>().seed()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
