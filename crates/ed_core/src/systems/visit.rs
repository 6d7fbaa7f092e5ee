//! Station visits shared by the arrival and service-completion systems.

use bevy_ecs::prelude::Entity;

use crate::clock::{EventKind, SimulationClock};
use crate::ecs::SimRng;
use crate::error::SimError;
use crate::routing::{BedPolicy, RoutingState, Track};
use crate::station::{ServiceRequest, StationId, StationRegistry};

/// Ask `station` for a server. On an immediate grant the completion is scheduled
/// now; a queued patient is scheduled when a release hands it the server.
pub(crate) fn start_visit(
    stations: &mut StationRegistry,
    clock: &mut SimulationClock,
    rng: &mut SimRng,
    station: StationId,
    patient: Entity,
) -> Result<(), SimError> {
    let now = clock.now();
    let target = stations.get_mut(station)?;
    match target.request_service(patient, now) {
        ServiceRequest::Granted => {
            let duration = target.sample_service_time(rng.rng_mut());
            log::trace!(
                "t={now:.3} {patient:?} starts service at {} for {duration:.3}",
                target.name()
            );
            clock.schedule_in(duration, EventKind::ServiceCompleted, Some(patient));
        }
        ServiceRequest::Queued { ahead } => {
            log::trace!(
                "t={now:.3} {patient:?} waits at {} behind {ahead}",
                target.name()
            );
        }
    }
    Ok(())
}

/// Release the server held at `station`; the head of its queue, if any, starts service.
pub(crate) fn finish_visit(
    stations: &mut StationRegistry,
    clock: &mut SimulationClock,
    rng: &mut SimRng,
    station: StationId,
) -> Result<(), SimError> {
    let now = clock.now();
    let target = stations.get_mut(station)?;
    if let Some(next) = target.release(now)? {
        let duration = target.sample_service_time(rng.rng_mut());
        log::trace!(
            "t={now:.3} {next:?} leaves queue at {} for {duration:.3}",
            target.name()
        );
        clock.schedule_in(duration, EventKind::ServiceCompleted, Some(next));
    }
    Ok(())
}

/// Step the routing state machine until the patient is at a station or done.
pub(crate) fn advance(
    track: &Track,
    policy: BedPolicy,
    from: RoutingState,
    rng: &mut SimRng,
) -> RoutingState {
    let mut state = track.next_state(from, policy, || rng.uniform());
    while state != RoutingState::Done && track.station_for(state).is_none() {
        state = track.next_state(state, policy, || rng.uniform());
    }
    state
}
