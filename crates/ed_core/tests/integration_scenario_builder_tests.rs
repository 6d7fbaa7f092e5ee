mod support;

use std::collections::BTreeMap;

use bevy_ecs::prelude::World;
use ed_core::distributions::DurationDistribution;
use ed_core::error::ConfigError;
use ed_core::routing::TrackConfig;
use ed_core::scenario::{build_scenario, EdConfig, PatientSource};
use ed_core::station::{StationConfig, StationRegistry};

#[test]
fn default_scenario_attaches_every_station() {
    let mut world = World::new();
    build_scenario(&mut world, &EdConfig::default(), Some(42)).expect("valid");

    let stations = world.resource::<StationRegistry>();
    let names: Vec<&str> = stations.iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        vec![
            "Main Lab 1",
            "Main Lab 2",
            "Main Lab 3",
            "Main Lab 4",
            "Main Doctor's Room",
            "Main Beds",
            "Fast Track Lab 1",
            "Fast Track Doctor's Room",
        ]
    );
    assert!(stations.iter().all(|s| s.busy_count() == 0 && s.queue_len() == 0));
    assert_eq!(world.resource::<PatientSource>().spawned(), 0);
}

#[test]
fn zero_capacity_is_rejected() {
    let mut config = EdConfig::default();
    config.station_mut("Main Doctor's Room").expect("station").capacity = 0;
    let err = build_scenario(&mut World::new(), &config, Some(1)).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidCapacity {
            station: "Main Doctor's Room".to_string(),
            capacity: 0,
        }
    );
}

#[test]
fn probability_outside_unit_interval_is_rejected() {
    let config = EdConfig::default().with_fast_track_probability(1.2);
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidProbability { ref field, .. }
        if field == "patient_source.fast_track_probability"));

    let mut config = EdConfig::default();
    config.station_mut("Main Beds").expect("beds").probability_needed = -0.1;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidProbability { .. })
    ));
}

#[test]
fn distribution_form_errors_name_the_field() {
    let mut params = BTreeMap::new();
    params.insert("mean".to_string(), 4.0);
    let err = DurationDistribution::from_parts("Main Lab 2.service_time", "Normal", &params)
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingParameter {
            field: "Main Lab 2.service_time".to_string(),
            parameter: "std",
        }
    );

    let err = DurationDistribution::from_parts("interarrival", "Weibull", &params).unwrap_err();
    assert!(err.to_string().contains("Weibull"));
}

#[test]
fn tracks_must_reference_configured_stations() {
    let mut config = EdConfig::default();
    config.main_track.doctor_room = "Triage".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::UnknownStation { ref station, .. }) if station == "Triage"
    ));
}

#[test]
fn fast_track_cannot_have_a_bed_or_empty_labs() {
    let mut config = EdConfig::default();
    config.fast_track = TrackConfig::new(
        vec!["Fast Track Lab 1".into()],
        "Fast Track Doctor's Room",
        Some("Main Beds".into()),
    );
    assert!(matches!(
        config.validate(),
        Err(ConfigError::FastTrackBed { .. })
    ));

    let mut config = EdConfig::default();
    config.main_track.labs.clear();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::EmptyLabSequence { .. })
    ));
}

#[test]
fn duplicate_station_names_are_rejected() {
    let mut config = EdConfig::default();
    config.stations.push(StationConfig::new(
        "Main Lab 1",
        2,
        DurationDistribution::exponential_mean(5.0),
        1.0,
    ));
    assert_eq!(
        config.validate().unwrap_err(),
        ConfigError::DuplicateStation {
            name: "Main Lab 1".to_string()
        }
    );
}

#[test]
fn config_round_trips_through_json() {
    let config = EdConfig::default().with_station(StationConfig::new(
        "Main Lab 3",
        2,
        DurationDistribution::Uniform {
            low: 2.0,
            high: 8.0,
        },
        0.25,
    ));
    let json = serde_json::to_string(&config).expect("serialize");
    let back: EdConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, config);
    assert_eq!(back.stations.len(), 8);
}

#[test]
fn separate_worlds_never_share_station_state() {
    let config = EdConfig::default();
    let mut a = World::new();
    let mut b = World::new();
    build_scenario(&mut a, &config, Some(1)).expect("valid");
    build_scenario(&mut b, &config, Some(1)).expect("valid");

    let lab = a.resource::<StationRegistry>().id_of("Main Lab 1").expect("lab");
    a.resource_mut::<StationRegistry>()
        .get_mut(lab)
        .expect("lab")
        .request_service(bevy_ecs::prelude::Entity::from_raw(1), 0.0);

    assert_eq!(a.resource::<StationRegistry>().get(lab).expect("lab").busy_count(), 1);
    assert_eq!(b.resource::<StationRegistry>().get(lab).expect("lab").busy_count(), 0);
}
