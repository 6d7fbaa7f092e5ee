//! End-to-end study: replications, then one statistics table per metric.

use serde::Serialize;

use ed_core::EdConfig;

use crate::error::AnalysisError;
use crate::params::AnalysisParams;
use crate::runner::{run_batch, Batch};
use crate::stats::{compile_stats_table, StationSummary};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub params: AnalysisParams,
    pub queue_length: Vec<StationSummary>,
    pub busy_staff: Vec<StationSummary>,
    pub batch: Batch,
}

impl AnalysisReport {
    /// Stations whose tolerance check failed in at least one replication, per metric.
    pub fn underpowered_stations(&self) -> Vec<(&'static str, &str)> {
        let queue = self
            .queue_length
            .iter()
            .filter(|s| !s.all_within_tolerance)
            .map(|s| ("queue_length", s.station.as_str()));
        let busy = self
            .busy_staff
            .iter()
            .filter(|s| !s.all_within_tolerance)
            .map(|s| ("busy_staff", s.station.as_str()));
        queue.chain(busy).collect()
    }
}

/// Run the batch described by `params` and summarise queue length and busy staff.
pub fn run_analysis(config: &EdConfig, params: &AnalysisParams) -> Result<AnalysisReport, AnalysisError> {
    let batch = run_batch(config, params)?;

    let queue_length = compile_stats_table(
        &batch.binned_queue_length(),
        params.burn_in_period,
        params.confidence_level,
        params.tolerance,
    );
    let busy_staff = compile_stats_table(
        &batch.binned_busy_staff(),
        params.burn_in_period,
        params.confidence_level,
        params.tolerance,
    );

    let report = AnalysisReport {
        params: params.clone(),
        queue_length,
        busy_staff,
        batch,
    };
    let underpowered = report.underpowered_stations();
    if !underpowered.is_empty() {
        log::info!(
            "{} station metrics exceed tolerance {}; consider more replications or a longer burn-in",
            underpowered.len(),
            params.tolerance
        );
    }
    Ok(report)
}
