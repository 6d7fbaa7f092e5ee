//! Test helpers for common test setup and utilities.
//!
//! This module provides small scenarios shared by unit tests, integration tests
//! and benchmarks.

use crate::distributions::DurationDistribution;
use crate::routing::TrackConfig;
use crate::scenario::{EdConfig, PatientSourceConfig};
use crate::station::StationConfig;

/// Build a department whose main track visits `main_labs` labs and whose stations
/// all share one capacity and one exponential service mean.
///
/// Stations are named `Lab 1..n`, `Doctor`, `Bed`, `FT Lab` and `FT Doctor`.
/// Every lab after the first uses `lab_probability`; the bed uses `bed_probability`.
pub fn uniform_department(
    main_labs: usize,
    capacity: usize,
    service_mean: f64,
    lab_probability: f64,
    bed_probability: f64,
) -> EdConfig {
    let svc = DurationDistribution::exponential_mean(service_mean);
    let lab_names: Vec<String> = (1..=main_labs).map(|i| format!("Lab {i}")).collect();

    let mut stations: Vec<StationConfig> = lab_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let p = if i == 0 { 1.0 } else { lab_probability };
            StationConfig::new(name.clone(), capacity, svc, p)
        })
        .collect();
    stations.push(StationConfig::new("Doctor", capacity, svc, 1.0));
    stations.push(StationConfig::new("Bed", capacity, svc, bed_probability));
    stations.push(StationConfig::new("FT Lab", capacity, svc, 1.0));
    stations.push(StationConfig::new("FT Doctor", capacity, svc, 1.0));

    EdConfig {
        stations,
        main_track: TrackConfig::new(lab_names, "Doctor", Some("Bed".to_string())),
        fast_track: TrackConfig::new(vec!["FT Lab".to_string()], "FT Doctor", None),
        patient_source: PatientSourceConfig {
            interarrival: DurationDistribution::exponential_mean(5.0),
            fast_track_probability: 0.0,
        },
        bed_policy: Default::default(),
    }
}

/// One lab, one doctor, capacity 1 everywhere, main track only.
pub fn single_server_department(service_mean: f64) -> EdConfig {
    uniform_department(1, 1, service_mean, 1.0, 0.0)
}
