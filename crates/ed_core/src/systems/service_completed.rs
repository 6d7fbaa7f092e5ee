use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{Patient, Routing, RunFault, SimRng, VisitHistory};
use crate::error::SimError;
use crate::routing::{RoutingState, Tracks};
use crate::station::StationRegistry;
use crate::systems::visit::{advance, finish_visit, start_visit};
use crate::telemetry::{CompletedPatientRecord, SimTelemetry};

/// Frees the server the subject patient held, starts the next waiting patient
/// there, then moves the subject to its next station or out of the department.
#[allow(clippy::too_many_arguments)]
pub fn service_completed_system(
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    mut stations: ResMut<StationRegistry>,
    mut rng: ResMut<SimRng>,
    mut telemetry: ResMut<SimTelemetry>,
    mut fault: ResMut<RunFault>,
    tracks: Res<Tracks>,
    event: Res<CurrentEvent>,
    mut patients: Query<(&Patient, &mut Routing, &mut VisitHistory)>,
) {
    if event.0.kind != EventKind::ServiceCompleted {
        return;
    }
    let Some(entity) = event.0.subject else {
        fault.record(SimError::UnknownPatient {
            entity: "<none>".to_string(),
        });
        return;
    };
    let Ok((patient, mut routing, mut history)) = patients.get_mut(entity) else {
        fault.record(SimError::UnknownPatient {
            entity: format!("{entity:?}"),
        });
        return;
    };

    let track = tracks.get(patient.track);
    let Some(station) = track.station_for(routing.0) else {
        fault.record(SimError::NotAtStation {
            patient: patient.id,
        });
        return;
    };
    if let Err(err) = finish_visit(&mut stations, &mut clock, &mut rng, station) {
        fault.record(err);
        return;
    }

    let next = advance(track, tracks.bed_policy, routing.0, &mut rng);
    routing.0 = next;
    if let Some(next_station) = track.station_for(next) {
        if let Err(err) = start_visit(&mut stations, &mut clock, &mut rng, next_station, entity) {
            fault.record(err);
            return;
        }
        history.0.push(next_station);
        return;
    }

    debug_assert_eq!(next, RoutingState::Done);
    let bed = track.bed.map(|b| b.station);
    let record = CompletedPatientRecord {
        patient_id: patient.id,
        track: patient.track,
        arrived_at: patient.arrived_at,
        completed_at: clock.now(),
        visited: history
            .0
            .iter()
            .filter_map(|id| stations.get(*id).ok().map(|s| s.name().to_string()))
            .collect(),
        used_bed: bed.is_some_and(|b| history.0.contains(&b)),
    };
    log::trace!(
        "t={:.3} patient {} leaves after {:.3}",
        record.completed_at,
        record.patient_id,
        record.length_of_stay()
    );
    telemetry.completed_patients.push(record);
    commands.entity(entity).despawn();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::distributions::DurationDistribution;
    use crate::routing::{TrackConfig, TrackKind};
    use crate::scenario::{build_scenario, EdConfig, PatientSourceConfig};
    use crate::station::{StationConfig, StationId};

    fn one_lab_config() -> EdConfig {
        let svc = DurationDistribution::exponential_mean(2.0);
        EdConfig {
            stations: vec![
                StationConfig::new("Lab", 1, svc, 1.0),
                StationConfig::new("Doctor", 1, svc, 1.0),
                StationConfig::new("Bed", 1, svc, 0.0),
                StationConfig::new("FT Lab", 1, svc, 1.0),
                StationConfig::new("FT Doctor", 1, svc, 1.0),
            ],
            main_track: TrackConfig::new(vec!["Lab".into()], "Doctor", Some("Bed".into())),
            fast_track: TrackConfig::new(vec!["FT Lab".into()], "FT Doctor", None),
            patient_source: PatientSourceConfig {
                interarrival: DurationDistribution::exponential_mean(5.0),
                fast_track_probability: 0.0,
            },
            bed_policy: Default::default(),
        }
    }

    fn completion_for(world: &mut World, entity: bevy_ecs::prelude::Entity) {
        let event = {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule_in(1.0, EventKind::ServiceCompleted, Some(entity));
            clock.pop_next().expect("completion")
        };
        world.insert_resource(CurrentEvent(event));
        let mut schedule = Schedule::default();
        schedule.add_systems(service_completed_system);
        schedule.run(world);
    }

    fn admit(world: &mut World, station: StationId) -> bevy_ecs::prelude::Entity {
        let entity = world
            .spawn((
                Patient {
                    id: 1,
                    track: TrackKind::Main,
                    arrived_at: 0.0,
                },
                Routing(RoutingState::VisitingLab(0)),
                VisitHistory(vec![station]),
            ))
            .id();
        world
            .resource_mut::<StationRegistry>()
            .get_mut(station)
            .expect("lab")
            .request_service(entity, 0.0);
        entity
    }

    #[test]
    fn lab_completion_moves_patient_to_doctor() {
        let mut world = World::new();
        build_scenario(&mut world, &one_lab_config(), Some(3)).expect("valid");
        let entity = admit(&mut world, StationId(0));

        completion_for(&mut world, entity);

        let routing = world.get::<Routing>(entity).expect("still present");
        assert_eq!(routing.0, RoutingState::AtDoctorRoom);
        let history = world.get::<VisitHistory>(entity).expect("history");
        assert_eq!(history.0, vec![StationId(0), StationId(1)]);

        let stations = world.resource::<StationRegistry>();
        assert_eq!(stations.get(StationId(0)).expect("lab").busy_count(), 0);
        assert_eq!(stations.get(StationId(1)).expect("doctor").busy_count(), 1);
    }

    #[test]
    fn doctor_completion_without_bed_discharges_and_despawns() {
        let mut world = World::new();
        build_scenario(&mut world, &one_lab_config(), Some(3)).expect("valid");
        let entity = admit(&mut world, StationId(0));
        completion_for(&mut world, entity);
        completion_for(&mut world, entity);

        assert!(world.get_entity(entity).is_none());
        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.completed_patients.len(), 1);
        let record = &telemetry.completed_patients[0];
        assert_eq!(record.visited, vec!["Lab".to_string(), "Doctor".to_string()]);
        assert!(!record.used_bed);
        assert!(record.completed_at > 1.0);
        assert!(record.length_of_stay() > 0.0);
    }

    #[test]
    fn unknown_subject_is_recorded_as_fault() {
        let mut world = World::new();
        build_scenario(&mut world, &one_lab_config(), Some(3)).expect("valid");
        let ghost = world.spawn_empty().id();
        world.despawn(ghost);

        completion_for(&mut world, ghost);

        let fault = world.resource::<RunFault>();
        assert!(matches!(fault.0, Some(SimError::UnknownPatient { .. })));
    }
}
