//! Steady-state estimation for the emergency-department simulation.
//!
//! This crate runs independent replications of an [ed_core::EdConfig] in
//! parallel, resamples each station's queue-length and busy-staff logs onto an
//! integer time grid, and summarises them with batch means and Student-t
//! confidence intervals. Moving averages of the cross-replication mean help pick
//! a burn-in period.
//!
//! # Quick Start
//!
//! ```no_run
//! use ed_analysis::{run_analysis, AnalysisParams};
//! use ed_core::EdConfig;
//!
//! let params = AnalysisParams::default()
//!     .with_burn_in(400.0)
//!     .with_replications(10)
//!     .with_seed(42);
//! let report = run_analysis(&EdConfig::default(), &params)?;
//! for row in &report.queue_length {
//!     println!("{}: {:.2} [{:.2}, {:.2}]", row.station, row.mean_of_means, row.ci_lower, row.ci_upper);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - [`params`]: run-level parameters and their validation
//! - [`runner`]: single and parallel replications using rayon
//! - [`binning`]: forward-filled integer-grid resampling
//! - [`moving_average`]: cross-replication averages and trailing windows
//! - [`stats`]: batch-means tables
//! - [`analysis`]: the whole pipeline in one call
//! - [`export`]: CSV and JSON output

pub mod analysis;
pub mod binning;
pub mod error;
pub mod export;
pub mod moving_average;
pub mod params;
pub mod runner;
pub mod stats;

pub use analysis::{run_analysis, AnalysisReport};
pub use binning::{bin_data, BinnedSample};
pub use error::AnalysisError;
pub use export::{
    export_binned_to_csv, export_moving_average_to_csv, export_report_to_json, export_stats_to_csv,
};
pub use moving_average::{moving_averages, MovingAverages};
pub use params::AnalysisParams;
pub use runner::{run_batch, run_simulation, Batch, Replication, SimulationRun};
pub use stats::{compile_stats_table, confidence_label, t_critical, StationSummary};
