#![allow(dead_code)]

use ed_analysis::AnalysisParams;
use ed_core::test_helpers::single_server_department;
use ed_core::EdConfig;

/// Mean time between arrivals in every helper department.
pub const MEAN_INTERARRIVAL: f64 = 5.0;

/// One lab and one doctor, one server each, exponential service with mean
/// `service_mean`. The lab sees the raw Poisson arrival stream, so it is an
/// M/M/1 queue with utilisation `service_mean / 5`.
pub fn mm1_department(service_mean: f64) -> EdConfig {
    single_server_department(service_mean)
}

/// Expected number waiting (excluding the patient in service) in an M/M/1 queue.
pub fn mm1_expected_queue(utilisation: f64) -> f64 {
    utilisation * utilisation / (1.0 - utilisation)
}

/// Small, seeded study that finishes quickly.
pub fn quick_params(seed: u64) -> AnalysisParams {
    AnalysisParams::default()
        .with_burn_in(100.0)
        .with_replications(4)
        .with_seed(seed)
        .with_threads(2)
}
