#![allow(dead_code)]

use bevy_ecs::prelude::World;
use ed_core::routing::BedPolicy;
use ed_core::runner::initialize_simulation;
use ed_core::scenario::{build_scenario, EdConfig};

/// Builder configuration for reproducible test worlds.
#[derive(Clone, Debug)]
pub struct TestWorldConfig {
    pub seed: u64,
    pub department: EdConfig,
}

impl Default for TestWorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            department: EdConfig::default(),
        }
    }
}

/// Helper that builds a scenario world and schedules the start event.
#[derive(Debug, Default)]
pub struct TestWorldBuilder {
    config: TestWorldConfig,
}

impl TestWorldBuilder {
    /// Create a new builder with the default department.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the RNG seed of the replication.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_department(mut self, department: EdConfig) -> Self {
        self.config.department = department;
        self
    }

    pub fn with_fast_track_probability(mut self, probability: f64) -> Self {
        self.config.department = self.config.department.with_fast_track_probability(probability);
        self
    }

    pub fn with_bed_policy(mut self, policy: BedPolicy) -> Self {
        self.config.department = self.config.department.with_bed_policy(policy);
        self
    }

    /// Build the world; the SimulationStarted event is already scheduled.
    pub fn build(self) -> World {
        let mut world = World::new();
        build_scenario(&mut world, &self.config.department, Some(self.config.seed))
            .expect("test department should be valid");
        initialize_simulation(&mut world);
        world
    }
}
