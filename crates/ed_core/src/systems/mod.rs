pub mod patient_arrival;
pub mod service_completed;
pub mod simulation_started;

mod visit;
