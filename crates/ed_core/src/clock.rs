use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

/// Simulated time. Units are whatever the configured distributions use (minutes in the defaults).
pub type SimTime = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    SimulationStarted,
    PatientArrival,
    ServiceCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub timestamp: SimTime,
    /// Insertion order; breaks ties between events at the same timestamp.
    pub sequence: u64,
    pub kind: EventKind,
    /// Patient the event is about (service completions).
    pub subject: Option<Entity>,
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, sequence).
        other
            .timestamp
            .total_cmp(&self.timestamp)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event being processed by the current schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: SimTime,
    next_sequence: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `kind` at an absolute time. Times in the past are clamped to `now`.
    pub fn schedule_at(&mut self, timestamp: SimTime, kind: EventKind, subject: Option<Entity>) {
        debug_assert!(!timestamp.is_nan(), "event timestamp must not be NaN");
        let timestamp = if timestamp < self.now {
            self.now
        } else {
            timestamp
        };
        let event = Event {
            timestamp,
            sequence: self.next_sequence,
            kind,
            subject,
        };
        self.next_sequence += 1;
        self.events.push(event);
    }

    /// Schedule `kind` after `delay` time units from now.
    pub fn schedule_in(&mut self, delay: SimTime, kind: EventKind, subject: Option<Entity>) {
        self.schedule_at(self.now + delay.max(0.0), kind, subject);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<SimTime> {
        self.events.peek().map(|e| e.timestamp)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
