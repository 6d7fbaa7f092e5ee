//! Telemetry: per-station event logs and per-patient completion records.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::SimTime;
use crate::routing::TrackKind;
use crate::station::{LogPoint, StationRegistry};

/// One patient that reached `Done` before the horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedPatientRecord {
    pub patient_id: u64,
    pub track: TrackKind,
    pub arrived_at: SimTime,
    pub completed_at: SimTime,
    /// Station names in visitation order.
    pub visited: Vec<String>,
    pub used_bed: bool,
}

impl CompletedPatientRecord {
    /// Time from arrival to leaving the department.
    pub fn length_of_stay(&self) -> SimTime {
        self.completed_at - self.arrived_at
    }
}

#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub main_arrivals: u64,
    pub fast_track_arrivals: u64,
    pub completed_patients: Vec<CompletedPatientRecord>,
}

impl SimTelemetry {
    pub fn record_arrival(&mut self, track: TrackKind) {
        match track {
            TrackKind::Main => self.main_arrivals += 1,
            TrackKind::FastTrack => self.fast_track_arrivals += 1,
        }
    }

    pub fn total_arrivals(&self) -> u64 {
        self.main_arrivals + self.fast_track_arrivals
    }
}

/// One log entry with its station name attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSample {
    pub station: String,
    pub time: SimTime,
    pub value: usize,
}

/// Raw logs of one run, flattened across stations in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLogs {
    /// Configured station names, including stations that never logged anything.
    pub stations: Vec<String>,
    pub queue_length: Vec<StationSample>,
    pub busy_staff: Vec<StationSample>,
}

impl RunLogs {
    pub fn from_registry(registry: &StationRegistry) -> Self {
        let mut logs = RunLogs::default();
        for station in registry.iter() {
            logs.stations.push(station.name().to_string());
            append(&mut logs.queue_length, station.name(), station.queue_length_log());
            append(&mut logs.busy_staff, station.name(), station.busy_staff_log());
        }
        logs
    }

    /// Samples of a single station from `samples`.
    pub fn for_station<'a>(
        samples: &'a [StationSample],
        station: &'a str,
    ) -> impl Iterator<Item = &'a StationSample> + 'a {
        samples.iter().filter(move |s| s.station == station)
    }
}

fn append(out: &mut Vec<StationSample>, station: &str, points: &[LogPoint]) {
    out.extend(points.iter().map(|p| StationSample {
        station: station.to_string(),
        time: p.time,
        value: p.value,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::DurationDistribution;
    use crate::station::{StationConfig, StationId};
    use bevy_ecs::prelude::Entity;

    #[test]
    fn run_logs_keep_station_order_and_names() {
        let svc = DurationDistribution::exponential_mean(1.0);
        let mut registry = StationRegistry::attach_all(&[
            StationConfig::new("A", 1, svc, 1.0),
            StationConfig::new("B", 1, svc, 1.0),
        ])
        .expect("valid");

        registry
            .get_mut(StationId(1))
            .expect("B")
            .request_service(Entity::from_raw(1), 2.0);

        let logs = RunLogs::from_registry(&registry);
        assert_eq!(logs.stations, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(logs.queue_length.len(), 2);
        assert!(logs.queue_length.iter().all(|s| s.station == "B" && s.time == 2.0));
        assert_eq!(RunLogs::for_station(&logs.busy_staff, "A").count(), 0);
    }
}
