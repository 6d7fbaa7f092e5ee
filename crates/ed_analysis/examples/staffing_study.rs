//! Example: does a second nurse in Main Lab 1 shorten the main-track queues?
//!
//! This example demonstrates how to:
//! 1. Run a replication study of the default department
//! 2. Read the batch-means tables and the tolerance flag
//! 3. Re-run the study with different staffing and compare
//! 4. Export tables, binned series and the full report
//!
//! Run with: cargo run -p ed_analysis --example staffing_study
//! Set RUST_LOG=ed_analysis=debug to see every replication.

use ed_analysis::{
    confidence_label, export_binned_to_csv, export_moving_average_to_csv, export_report_to_json,
    export_stats_to_csv, run_analysis, AnalysisParams, StationSummary,
};
use ed_core::EdConfig;

fn print_table(title: &str, rows: &[StationSummary], confidence_level: f64) {
    println!("\n{title}");
    println!(
        "  {:<26} {:>8} {:>8} {:>17}  within tol.",
        "station",
        "mean",
        "std",
        confidence_label(confidence_level)
    );
    for row in rows {
        println!(
            "  {:<26} {:>8.3} {:>8.3} [{:>6.3}, {:>6.3}]  {}",
            row.station,
            row.mean_of_means,
            row.std_of_means,
            row.ci_lower,
            row.ci_upper,
            if row.all_within_tolerance { "yes" } else { "no" }
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let params = AnalysisParams::default()
        .with_burn_in(400.0)
        .with_replications(20)
        .with_seed(2024)
        .with_progress(true);

    println!("Running baseline department...");
    let baseline = run_analysis(&EdConfig::default(), &params)?;
    print_table("Baseline: queue length", &baseline.queue_length, params.confidence_level);
    print_table("Baseline: busy staff", &baseline.busy_staff, params.confidence_level);

    let mut staffed = EdConfig::default();
    if let Some(lab) = staffed.station_mut("Main Lab 1") {
        lab.capacity = 2;
    }
    println!("\nRunning with two nurses in Main Lab 1...");
    let improved = run_analysis(&staffed, &params)?;
    print_table("Two nurses: queue length", &improved.queue_length, params.confidence_level);

    println!("\nChange in mean queue length:");
    for (before, after) in baseline.queue_length.iter().zip(&improved.queue_length) {
        println!(
            "  {:<26} {:>+8.3}",
            before.station,
            after.mean_of_means - before.mean_of_means
        );
    }

    let underpowered = baseline.underpowered_stations();
    if !underpowered.is_empty() {
        println!("\nTolerance not met (consider more replications or a longer burn-in):");
        for (metric, station) in underpowered {
            println!("  {metric}: {station}");
        }
    }

    let out_dir = std::env::temp_dir().join("ed_staffing_study");
    export_stats_to_csv(&baseline.queue_length, out_dir.join("queue_length_stats.csv"))?;
    export_stats_to_csv(&baseline.busy_staff, out_dir.join("busy_staff_stats.csv"))?;
    export_binned_to_csv(&baseline.batch, out_dir.join("binned.csv"))?;
    export_moving_average_to_csv(
        &baseline.batch.queue_moving_average,
        out_dir.join("queue_length_mavg.csv"),
    )?;
    export_report_to_json(&baseline, out_dir.join("report.json"))?;
    println!("\nResults exported to {}", out_dir.display());

    Ok(())
}
