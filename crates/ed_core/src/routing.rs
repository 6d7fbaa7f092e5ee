//! Patient routing: the per-patient state machine that walks a track.
//!
//! `Arrived -> VisitingLab[0] -> ... -> AtDoctorRoom -> (AtBed | Discharged) -> Done`.
//!
//! The first lab is always visited. Each later lab is entered only if a uniform
//! draw falls below that lab's probability-needed; the first failed draw sends
//! the patient straight to the doctor's room. Fast-track patients never use a bed.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::station::{StationConfig, StationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Main,
    FastTrack,
}

impl TrackKind {
    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Main => "main",
            TrackKind::FastTrack => "fast-track",
        }
    }
}

/// How a main-track patient decides whether to use a bed after the doctor's room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BedPolicy {
    /// Bed used when a uniform draw is below the bed station's probability-needed.
    #[default]
    ByProbability,
    /// Every main-track patient goes to a bed.
    AlwaysForMain,
}

/// Track layout by station name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    /// Visitation order; the first lab is mandatory.
    pub labs: Vec<String>,
    pub doctor_room: String,
    #[serde(default)]
    pub bed: Option<String>,
}

impl TrackConfig {
    pub fn new(labs: Vec<String>, doctor_room: impl Into<String>, bed: Option<String>) -> Self {
        Self {
            labs,
            doctor_room: doctor_room.into(),
            bed,
        }
    }

    /// Resolve station names against the configured stations.
    pub fn resolve(&self, kind: TrackKind, stations: &[StationConfig]) -> Result<Track, ConfigError> {
        let lookup = |name: &str| {
            stations
                .iter()
                .position(|s| s.name == name)
                .map(|idx| Stop {
                    station: StationId(idx),
                    probability_needed: stations[idx].probability_needed,
                })
                .ok_or_else(|| ConfigError::UnknownStation {
                    track: kind.label().to_string(),
                    station: name.to_string(),
                })
        };

        if self.labs.is_empty() {
            return Err(ConfigError::EmptyLabSequence {
                track: kind.label().to_string(),
            });
        }
        if let (TrackKind::FastTrack, Some(bed)) = (kind, &self.bed) {
            return Err(ConfigError::FastTrackBed {
                station: bed.clone(),
            });
        }

        let labs = self
            .labs
            .iter()
            .map(|name| lookup(name))
            .collect::<Result<Vec<_>, _>>()?;
        let doctor_room = lookup(&self.doctor_room)?;
        let bed = self.bed.as_deref().map(lookup).transpose()?;

        Ok(Track {
            kind,
            labs,
            doctor_room,
            bed,
        })
    }
}

/// A station on a resolved track, with the probability used when deciding to enter it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    pub station: StationId,
    pub probability_needed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub kind: TrackKind,
    pub labs: Vec<Stop>,
    pub doctor_room: Stop,
    pub bed: Option<Stop>,
}

impl Track {
    /// Station a patient in `state` is being served at, if any.
    pub fn station_for(&self, state: RoutingState) -> Option<StationId> {
        match state {
            RoutingState::VisitingLab(i) => self.labs.get(i).map(|s| s.station),
            RoutingState::AtDoctorRoom => Some(self.doctor_room.station),
            RoutingState::AtBed => self.bed.map(|s| s.station),
            RoutingState::Arrived | RoutingState::Discharged | RoutingState::Done => None,
        }
    }

    /// Next state after `state` completes. `draw` yields uniform values in `[0, 1)`
    /// and is only called when a probabilistic edge is evaluated.
    pub fn next_state<F>(&self, state: RoutingState, policy: BedPolicy, mut draw: F) -> RoutingState
    where
        F: FnMut() -> f64,
    {
        match state {
            RoutingState::Arrived => {
                if self.labs.is_empty() {
                    RoutingState::AtDoctorRoom
                } else {
                    RoutingState::VisitingLab(0)
                }
            }
            RoutingState::VisitingLab(i) => match self.labs.get(i + 1) {
                Some(next) if draw() < next.probability_needed => RoutingState::VisitingLab(i + 1),
                _ => RoutingState::AtDoctorRoom,
            },
            RoutingState::AtDoctorRoom => match (self.kind, self.bed) {
                (TrackKind::Main, Some(bed)) => {
                    let needs_bed = match policy {
                        BedPolicy::ByProbability => draw() < bed.probability_needed,
                        BedPolicy::AlwaysForMain => true,
                    };
                    if needs_bed {
                        RoutingState::AtBed
                    } else {
                        RoutingState::Discharged
                    }
                }
                _ => RoutingState::Discharged,
            },
            RoutingState::AtBed | RoutingState::Discharged | RoutingState::Done => {
                RoutingState::Done
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoutingState {
    Arrived,
    VisitingLab(usize),
    AtDoctorRoom,
    AtBed,
    Discharged,
    Done,
}

/// Both resolved tracks plus the bed policy for one run.
#[derive(Debug, Clone, Resource)]
pub struct Tracks {
    pub main: Track,
    pub fast_track: Track,
    pub bed_policy: BedPolicy,
}

impl Tracks {
    pub fn get(&self, kind: TrackKind) -> &Track {
        match kind {
            TrackKind::Main => &self.main,
            TrackKind::FastTrack => &self.fast_track,
        }
    }
}
