use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};

/// Opens the department: the first patient arrives at the start time.
pub fn simulation_started_system(mut clock: ResMut<SimulationClock>, event: Res<CurrentEvent>) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }

    let now = clock.now();
    clock.schedule_at(now, EventKind::PatientArrival, None);
}
