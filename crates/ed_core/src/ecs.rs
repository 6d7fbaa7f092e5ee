use bevy_ecs::prelude::{Component, Resource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::SimTime;
use crate::error::SimError;
use crate::routing::{RoutingState, TrackKind};
use crate::station::StationId;

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Patient {
    /// Spawn order, starting at 1.
    pub id: u64,
    pub track: TrackKind,
    pub arrived_at: SimTime,
}

/// Where the patient currently is on its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Routing(pub RoutingState);

/// Stations the patient has been sent to, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Component)]
pub struct VisitHistory(pub Vec<StationId>);

/// Random source for one replication. Every draw in the run goes through it.
#[derive(Debug, Resource)]
pub struct SimRng {
    rng: StdRng,
    seed: u64,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from entropy; the chosen seed is kept so the run can be replayed.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen()
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// First error raised inside a system; the runner aborts the run when set.
#[derive(Debug, Default, Resource)]
pub struct RunFault(pub Option<SimError>);

impl RunFault {
    pub fn record(&mut self, err: SimError) {
        if self.0.is_none() {
            log::warn!("simulation fault: {err}");
            self.0 = Some(err);
        }
    }
}
