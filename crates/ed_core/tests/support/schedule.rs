#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use ed_core::clock::{Event, SimTime};
use ed_core::error::SimError;
use ed_core::runner::{run_next_event, run_until, run_until_with_hook, simulation_schedule};

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    /// Create a runner with the default simulation schedule.
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule).expect("simulation step")
    }

    /// Run every event strictly before `until`, returning the number of steps executed.
    pub fn run_until(&mut self, world: &mut World, until: SimTime) -> usize {
        run_until(world, &mut self.schedule, until).expect("simulation run")
    }

    /// Like [Self::run_until], but surfaces the run error instead of panicking.
    pub fn try_run_until(&mut self, world: &mut World, until: SimTime) -> Result<usize, SimError> {
        run_until(world, &mut self.schedule, until)
    }

    /// Run until `until`, calling `check` after every processed event.
    pub fn run_checked<F>(&mut self, world: &mut World, until: SimTime, check: F) -> usize
    where
        F: FnMut(&World, &Event),
    {
        run_until_with_hook(world, &mut self.schedule, until, check).expect("simulation run")
    }
}
