//! Run one replication of the default department and print what happened.
//!
//! Run with: cargo run -p ed_core --example scenario_run
//! Set RUST_LOG=ed_core=debug for event counts, =trace for every patient movement.

use ed_core::telemetry::RunLogs;
use ed_core::{EdConfig, EmergencyDepartment, TrackKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    const SEED: u64 = 123;
    const SIMULATED_DAYS: f64 = 7.0;
    let until = SIMULATED_DAYS * 24.0 * 60.0;

    let mut ed = EmergencyDepartment::new(&EdConfig::default(), Some(SEED))?;
    let logs = ed.run(until)?;
    let telemetry = ed.telemetry();

    println!(
        "--- Default department, {SIMULATED_DAYS} days ({until} min), seed {SEED} ---"
    );
    println!(
        "Arrivals: {} main, {} fast track",
        telemetry.main_arrivals, telemetry.fast_track_arrivals
    );
    println!("Completed: {}", telemetry.completed_patients.len());

    for track in [TrackKind::Main, TrackKind::FastTrack] {
        let stays: Vec<f64> = telemetry
            .completed_patients
            .iter()
            .filter(|r| r.track == track)
            .map(|r| r.length_of_stay())
            .collect();
        if !stays.is_empty() {
            let mean = stays.iter().sum::<f64>() / stays.len() as f64;
            println!("  {:<10} mean length of stay {:.1} min", track.label(), mean);
        }
    }

    println!("\nStation activity:");
    for station in ed.stations().iter() {
        let samples = RunLogs::for_station(&logs.queue_length, station.name()).count();
        let longest = RunLogs::for_station(&logs.queue_length, station.name())
            .map(|s| s.value)
            .max()
            .unwrap_or(0);
        println!(
            "  {:<26} {:>6} queue samples, longest queue {:>3}, busy now {}/{}",
            station.name(),
            samples,
            longest,
            station.busy_count(),
            station.capacity()
        );
    }
    Ok(())
}
