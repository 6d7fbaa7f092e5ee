//! Stations: bounded-capacity service points with a FIFO wait queue.
//!
//! A [StationConfig] is plain data. Calling [StationConfig::attach] validates it
//! and produces a runtime [Station]; only runtime stations can grant or release
//! servers. Every request, grant and release appends to the station's logs at
//! the simulated time passed in by the caller.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::SimTime;
use crate::distributions::{DurationDistribution, DurationSampler};
use crate::error::{ConfigError, SimError};

/// Index of an attached station inside [StationRegistry].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    pub name: String,
    /// Number of concurrent servers (nurses, doctors, beds).
    pub capacity: usize,
    pub service_time: DurationDistribution,
    /// Labs: chance the lab is needed after the previous one. Beds: chance a
    /// main-track patient needs a bed. Ignored for the first lab and doctor's rooms.
    pub probability_needed: f64,
}

impl StationConfig {
    pub fn new(
        name: impl Into<String>,
        capacity: usize,
        service_time: DurationDistribution,
        probability_needed: f64,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            service_time,
            probability_needed,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity {
                station: self.name.clone(),
                capacity: self.capacity,
            });
        }
        if !(0.0..=1.0).contains(&self.probability_needed) {
            return Err(ConfigError::InvalidProbability {
                field: format!("{}.probability_needed", self.name),
                value: self.probability_needed,
            });
        }
        self.service_time
            .validate(&format!("{}.service_time", self.name))
    }

    /// Build a fresh runtime station with empty queue and logs.
    pub fn attach(&self) -> Result<Station, ConfigError> {
        self.validate()?;
        let sampler = self
            .service_time
            .sampler(&format!("{}.service_time", self.name))?;
        Ok(Station {
            name: self.name.clone(),
            capacity: self.capacity,
            probability_needed: self.probability_needed,
            sampler,
            busy: 0,
            queue: VecDeque::new(),
            queue_length_log: Vec::new(),
            busy_staff_log: Vec::new(),
        })
    }
}

/// One point of a station's step-function log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogPoint {
    pub time: SimTime,
    pub value: usize,
}

/// Outcome of [Station::request_service].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRequest {
    /// A server was free; service starts now.
    Granted,
    /// All servers busy; `ahead` requests are waiting in front of this one.
    Queued { ahead: usize },
}

#[derive(Debug)]
pub struct Station {
    name: String,
    capacity: usize,
    probability_needed: f64,
    sampler: DurationSampler,
    busy: usize,
    queue: VecDeque<Entity>,
    queue_length_log: Vec<LogPoint>,
    busy_staff_log: Vec<LogPoint>,
}

impl Station {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn probability_needed(&self) -> f64 {
        self.probability_needed
    }

    pub fn busy_count(&self) -> usize {
        self.busy
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Patients waiting for a server, head first.
    pub fn waiting(&self) -> impl Iterator<Item = Entity> + '_ {
        self.queue.iter().copied()
    }

    pub fn queue_length_log(&self) -> &[LogPoint] {
        &self.queue_length_log
    }

    pub fn busy_staff_log(&self) -> &[LogPoint] {
        &self.busy_staff_log
    }

    /// Fresh service duration for one visit.
    pub fn sample_service_time<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        self.sampler.sample(rng)
    }

    /// Ask for a server. Logs the queue depth seen by the request; if a server
    /// is free it is granted immediately, otherwise the patient joins the tail.
    pub fn request_service(&mut self, patient: Entity, now: SimTime) -> ServiceRequest {
        if self.busy < self.capacity && self.queue.is_empty() {
            self.log_queue_length(now);
            self.grant(now);
            ServiceRequest::Granted
        } else {
            let ahead = self.queue.len();
            self.queue.push_back(patient);
            self.log_queue_length(now);
            ServiceRequest::Queued { ahead }
        }
    }

    /// Free one server. If anyone is waiting, the head of the queue is granted
    /// the server at `now` and returned.
    pub fn release(&mut self, now: SimTime) -> Result<Option<Entity>, SimError> {
        if self.busy == 0 {
            return Err(SimError::ReleaseWithoutGrant {
                station: self.name.clone(),
            });
        }
        self.busy -= 1;
        self.log_busy_staff(now);

        if self.busy < self.capacity {
            if let Some(next) = self.queue.pop_front() {
                self.grant(now);
                return Ok(Some(next));
            }
        }
        Ok(None)
    }

    /// Clear queue, busy count and logs.
    pub fn reset(&mut self) {
        self.busy = 0;
        self.queue.clear();
        self.queue_length_log.clear();
        self.busy_staff_log.clear();
    }

    fn grant(&mut self, now: SimTime) {
        debug_assert!(self.busy < self.capacity);
        self.log_queue_length(now);
        self.busy += 1;
        self.log_busy_staff(now);
    }

    fn log_queue_length(&mut self, now: SimTime) {
        self.queue_length_log.push(LogPoint {
            time: now,
            value: self.queue.len(),
        });
    }

    fn log_busy_staff(&mut self, now: SimTime) {
        self.busy_staff_log.push(LogPoint {
            time: now,
            value: self.busy,
        });
    }
}

/// All stations attached to one run, in configuration order.
#[derive(Debug, Default, Resource)]
pub struct StationRegistry {
    stations: Vec<Station>,
}

impl StationRegistry {
    pub fn attach_all(configs: &[StationConfig]) -> Result<Self, ConfigError> {
        let stations = configs
            .iter()
            .map(StationConfig::attach)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stations })
    }

    pub fn get(&self, id: StationId) -> Result<&Station, SimError> {
        self.stations
            .get(id.0)
            .ok_or(SimError::UnboundStation { station: id.0 })
    }

    pub fn get_mut(&mut self, id: StationId) -> Result<&mut Station, SimError> {
        self.stations
            .get_mut(id.0)
            .ok_or(SimError::UnboundStation { station: id.0 })
    }

    pub fn id_of(&self, name: &str) -> Option<StationId> {
        self.stations
            .iter()
            .position(|s| s.name == name)
            .map(StationId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn reset_all(&mut self) {
        self.stations.iter_mut().for_each(Station::reset);
    }
}
