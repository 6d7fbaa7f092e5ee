use std::collections::HashSet;

use bevy_ecs::prelude::Resource;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::SimTime;
use crate::distributions::{DurationDistribution, DurationSampler};
use crate::error::ConfigError;
use crate::routing::{BedPolicy, TrackConfig, TrackKind, Tracks};
use crate::station::StationConfig;

/// Mean time between patient arrivals in the default scenario.
const DEFAULT_MEAN_INTERARRIVAL: f64 = 5.0;

/// Mean lab/doctor service time in the default scenario.
const DEFAULT_MEAN_SERVICE: f64 = 5.0;

/// Mean bed stay in the default scenario (12 hours in minutes).
const DEFAULT_MEAN_BED_STAY: f64 = 720.0;

const DEFAULT_FAST_TRACK_PROBABILITY: f64 = 0.8;

/// Simulation horizon. When present, the runner stops before the first event at or after it.
#[derive(Debug, Clone, Copy, PartialEq, Resource)]
pub struct SimulationEndTime(pub SimTime);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientSourceConfig {
    pub interarrival: DurationDistribution,
    /// Chance an arriving patient is routed to the fast track.
    pub fast_track_probability: f64,
}

impl Default for PatientSourceConfig {
    fn default() -> Self {
        Self {
            interarrival: DurationDistribution::exponential_mean(DEFAULT_MEAN_INTERARRIVAL),
            fast_track_probability: DEFAULT_FAST_TRACK_PROBABILITY,
        }
    }
}

/// Full emergency-department configuration: stations, both tracks and the arrival stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdConfig {
    pub stations: Vec<StationConfig>,
    pub main_track: TrackConfig,
    pub fast_track: TrackConfig,
    pub patient_source: PatientSourceConfig,
    #[serde(default)]
    pub bed_policy: BedPolicy,
}

impl Default for EdConfig {
    fn default() -> Self {
        let service = DurationDistribution::exponential_mean(DEFAULT_MEAN_SERVICE);
        let stations = vec![
            StationConfig::new("Main Lab 1", 1, service, 1.0),
            StationConfig::new("Main Lab 2", 1, service, 0.5),
            StationConfig::new("Main Lab 3", 1, service, 0.5),
            StationConfig::new("Main Lab 4", 1, service, 0.5),
            StationConfig::new("Main Doctor's Room", 1, service, 1.0),
            StationConfig::new(
                "Main Beds",
                30,
                DurationDistribution::exponential_mean(DEFAULT_MEAN_BED_STAY),
                0.01,
            ),
            StationConfig::new("Fast Track Lab 1", 1, service, 1.0),
            StationConfig::new("Fast Track Doctor's Room", 1, service, 1.0),
        ];

        Self {
            stations,
            main_track: TrackConfig::new(
                vec![
                    "Main Lab 1".into(),
                    "Main Lab 2".into(),
                    "Main Lab 3".into(),
                    "Main Lab 4".into(),
                ],
                "Main Doctor's Room",
                Some("Main Beds".into()),
            ),
            fast_track: TrackConfig::new(
                vec!["Fast Track Lab 1".into()],
                "Fast Track Doctor's Room",
                None,
            ),
            patient_source: PatientSourceConfig::default(),
            bed_policy: BedPolicy::default(),
        }
    }
}

impl EdConfig {
    pub fn with_bed_policy(mut self, policy: BedPolicy) -> Self {
        self.bed_policy = policy;
        self
    }

    pub fn with_fast_track_probability(mut self, probability: f64) -> Self {
        self.patient_source.fast_track_probability = probability;
        self
    }

    pub fn with_interarrival(mut self, interarrival: DurationDistribution) -> Self {
        self.patient_source.interarrival = interarrival;
        self
    }

    /// Replace the station with the same name, or append it.
    pub fn with_station(mut self, station: StationConfig) -> Self {
        match self.stations.iter_mut().find(|s| s.name == station.name) {
            Some(existing) => *existing = station,
            None => self.stations.push(station),
        }
        self
    }

    pub fn station_mut(&mut self, name: &str) -> Option<&mut StationConfig> {
        self.stations.iter_mut().find(|s| s.name == name)
    }

    /// Validate everything and resolve both tracks.
    pub fn validate(&self) -> Result<Tracks, ConfigError> {
        let mut seen = HashSet::new();
        for station in &self.stations {
            if !seen.insert(station.name.as_str()) {
                return Err(ConfigError::DuplicateStation {
                    name: station.name.clone(),
                });
            }
            station.validate()?;
        }

        let source = &self.patient_source;
        if !(0.0..=1.0).contains(&source.fast_track_probability) {
            return Err(ConfigError::InvalidProbability {
                field: "patient_source.fast_track_probability".to_string(),
                value: source.fast_track_probability,
            });
        }
        source.interarrival.validate("patient_source.interarrival")?;

        Ok(Tracks {
            main: self.main_track.resolve(TrackKind::Main, &self.stations)?,
            fast_track: self
                .fast_track
                .resolve(TrackKind::FastTrack, &self.stations)?,
            bed_policy: self.bed_policy,
        })
    }
}

/// Arrival stream state for one run.
#[derive(Debug, Resource)]
pub struct PatientSource {
    interarrival: DurationSampler,
    fast_track_probability: f64,
    spawned: u64,
}

impl PatientSource {
    pub fn new(config: &PatientSourceConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            interarrival: config.interarrival.sampler("patient_source.interarrival")?,
            fast_track_probability: config.fast_track_probability,
            spawned: 0,
        })
    }

    /// Identifier for the next patient (1, 2, ...).
    pub fn next_id(&mut self) -> u64 {
        self.spawned += 1;
        self.spawned
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Pick a track from a uniform draw in `[0, 1)`.
    pub fn choose_track(&self, draw: f64) -> TrackKind {
        if draw < self.fast_track_probability {
            TrackKind::FastTrack
        } else {
            TrackKind::Main
        }
    }

    pub fn sample_interarrival<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        self.interarrival.sample(rng)
    }
}
