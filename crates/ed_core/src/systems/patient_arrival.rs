use bevy_ecs::prelude::{Commands, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Patient, Routing, RunFault, SimRng, VisitHistory};
use crate::routing::{RoutingState, Tracks};
use crate::scenario::PatientSource;
use crate::station::StationRegistry;
use crate::systems::visit::{advance, start_visit};
use crate::telemetry::SimTelemetry;

/// Spawns one patient, sends it to its first lab and schedules the next arrival.
///
/// The arrival stream never ends on its own; the runner's horizon bounds it.
#[allow(clippy::too_many_arguments)]
pub fn patient_arrival_system(
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    mut source: ResMut<PatientSource>,
    mut stations: ResMut<StationRegistry>,
    mut rng: ResMut<SimRng>,
    mut telemetry: ResMut<SimTelemetry>,
    mut fault: ResMut<RunFault>,
    tracks: Res<Tracks>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::PatientArrival {
        return;
    }

    let now = clock.now();
    let id = source.next_id();
    let kind = source.choose_track(rng.uniform());
    let track = tracks.get(kind);
    let state = advance(track, tracks.bed_policy, RoutingState::Arrived, &mut rng);

    let entity = commands.spawn_empty().id();
    let mut history = VisitHistory::default();
    if let Some(station) = track.station_for(state) {
        if let Err(err) = start_visit(&mut stations, &mut clock, &mut rng, station, entity) {
            fault.record(err);
            return;
        }
        history.0.push(station);
    }
    log::trace!("t={now:.3} patient {id} ({}) arrives as {entity:?}", kind.label());

    commands.entity(entity).insert((
        Patient {
            id,
            track: kind,
            arrived_at: now,
        },
        Routing(state),
        history,
    ));
    telemetry.record_arrival(kind);

    let gap = source.sample_interarrival(rng.rng_mut());
    clock.schedule_in(gap, EventKind::PatientArrival, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::scenario::{build_scenario, EdConfig};

    #[test]
    fn arrival_spawns_patient_at_first_lab_and_schedules_next() {
        let mut world = World::new();
        build_scenario(&mut world, &EdConfig::default(), Some(11)).expect("valid");
        let arrival = {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule_at(0.0, EventKind::PatientArrival, None);
            clock.pop_next().expect("arrival")
        };
        world.insert_resource(CurrentEvent(arrival));

        let mut schedule = Schedule::default();
        schedule.add_systems(patient_arrival_system);
        schedule.run(&mut world);

        let (patient, routing, history) = {
            let mut query = world.query::<(&Patient, &Routing, &VisitHistory)>();
            let (p, r, h) = query.single(&world);
            (*p, *r, h.clone())
        };
        assert_eq!(patient.id, 1);
        assert_eq!(routing.0, RoutingState::VisitingLab(0));
        assert_eq!(history.0.len(), 1);

        let tracks = world.resource::<Tracks>();
        assert_eq!(history.0[0], tracks.get(patient.track).labs[0].station);

        // Service completion for the new patient plus the next arrival.
        let clock = world.resource::<SimulationClock>();
        assert_eq!(clock.pending(), 2);
        assert_eq!(world.resource::<SimTelemetry>().total_arrivals(), 1);
    }
}
