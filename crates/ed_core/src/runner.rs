//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule. Systems report failures through [RunFault]; the
//! runner turns the first one into an error and stops.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimTime, SimulationClock};
use crate::ecs::RunFault;
use crate::error::SimError;
use crate::profiling::EventMetrics;
use crate::scenario::SimulationEndTime;
use crate::systems::{
    patient_arrival::patient_arrival_system, service_completed::service_completed_system,
    simulation_started::simulation_started_system,
};

fn is_simulation_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SimulationStarted)
        .unwrap_or(false)
}

fn is_patient_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::PatientArrival)
        .unwrap_or(false)
}

fn is_service_completed(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::ServiceCompleted)
        .unwrap_or(false)
}

/// Builds the simulation schedule. Every event is handled by exactly one system;
/// the single-threaded executor keeps draws from [crate::ecs::SimRng] in a fixed order.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (
            simulation_started_system.run_if(is_simulation_started),
            patient_arrival_system.run_if(is_patient_arrival),
            service_completed_system.run_if(is_service_completed),
        )
            .chain(),
    );
    schedule
}

/// Schedules the SimulationStarted event at time 0.
/// Call this after building the scenario and before running events.
pub fn initialize_simulation(world: &mut World) {
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_at(0.0, EventKind::SimulationStarted, None);
}

/// Pops the next event unless it lies at or past [SimulationEndTime].
fn pop_due_event(world: &mut World) -> Result<Option<Event>, SimError> {
    let stop_at = world.get_resource::<SimulationEndTime>().map(|e| e.0);
    let mut clock = world
        .get_resource_mut::<SimulationClock>()
        .ok_or(SimError::MissingResource("SimulationClock"))?;
    if let (Some(end), Some(ts)) = (stop_at, clock.next_event_time()) {
        if ts >= end {
            return Ok(None);
        }
    }
    Ok(clock.pop_next())
}

fn take_fault(world: &mut World) -> Result<(), SimError> {
    match world
        .get_resource_mut::<RunFault>()
        .and_then(|mut fault| fault.0.take())
    {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Runs one simulation step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `Ok(true)` if an event was processed, `Ok(false)` if the clock was empty or the next
/// event is at or past [SimulationEndTime] (when that resource is present).
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> Result<bool, SimError> {
    run_next_event_with_hook(world, schedule, |_, _| {})
}

/// Runs one simulation step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    mut hook: F,
) -> Result<bool, SimError>
where
    F: FnMut(&World, &Event),
{
    let Some(event) = pop_due_event(world)? else {
        return Ok(false);
    };
    world.insert_resource(CurrentEvent(event));

    if let Some(mut metrics) = world.get_resource_mut::<EventMetrics>() {
        metrics.record_event(event.kind);
    }

    schedule.run(world);
    take_fault(world)?;
    hook(world, &event);
    Ok(true)
}

/// Runs events strictly before `until`. Patients still in the department at the
/// horizon are abandoned. Returns the number of events processed.
pub fn run_until(world: &mut World, schedule: &mut Schedule, until: SimTime) -> Result<usize, SimError> {
    run_until_with_hook(world, schedule, until, |_, _| {})
}

/// Runs until the horizon and invokes `hook` after each step.
pub fn run_until_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    until: SimTime,
    mut hook: F,
) -> Result<usize, SimError>
where
    F: FnMut(&World, &Event),
{
    world.insert_resource(SimulationEndTime(until));
    let mut steps = 0;
    while run_next_event_with_hook(world, schedule, &mut hook)? {
        steps += 1;
    }
    if let Some(metrics) = world.get_resource::<EventMetrics>() {
        metrics.log_summary();
    }
    Ok(steps)
}
