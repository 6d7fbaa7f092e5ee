//! Replications, run one at a time or in parallel with rayon.
//!
//! Every replication builds its own world from the shared [EdConfig], so
//! stations are never reused across runs and no reset step is needed.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use ed_core::telemetry::RunLogs;
use ed_core::{EdConfig, EmergencyDepartment, SimError, SimTime};

use crate::binning::{bin_data, BinnedSample};
use crate::error::AnalysisError;
use crate::moving_average::{moving_averages, MovingAverages};
use crate::params::AnalysisParams;

/// Raw result of one replication.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    pub seed: u64,
    pub until: SimTime,
    pub logs: RunLogs,
    pub arrivals: u64,
    pub completed_patients: usize,
}

impl SimulationRun {
    /// Queue-length and busy-staff series on the integer grid `[0, until]`.
    pub fn bin(&self) -> BinnedRun {
        BinnedRun {
            queue_length: bin_data(&self.logs.queue_length, &self.logs.stations, self.until),
            busy_staff: bin_data(&self.logs.busy_staff, &self.logs.stations, self.until),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedRun {
    pub queue_length: Vec<BinnedSample>,
    pub busy_staff: Vec<BinnedSample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Replication {
    pub index: usize,
    pub run: SimulationRun,
    pub binned: BinnedRun,
}

/// All replications of a study plus the smoothed cross-replication averages.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub replications: Vec<Replication>,
    pub queue_moving_average: MovingAverages,
    pub busy_moving_average: MovingAverages,
}

impl Batch {
    pub fn binned_queue_length(&self) -> Vec<&[BinnedSample]> {
        self.replications
            .iter()
            .map(|r| r.binned.queue_length.as_slice())
            .collect()
    }

    pub fn binned_busy_staff(&self) -> Vec<&[BinnedSample]> {
        self.replications
            .iter()
            .map(|r| r.binned.busy_staff.as_slice())
            .collect()
    }

    /// Seeds actually used, in replication order.
    pub fn seeds(&self) -> Vec<u64> {
        self.replications.iter().map(|r| r.run.seed).collect()
    }
}

/// Run one replication of `config` over `[0, until)`.
pub fn run_simulation(
    config: &EdConfig,
    until: SimTime,
    seed: Option<u64>,
) -> Result<SimulationRun, SimError> {
    let mut ed = EmergencyDepartment::new(config, seed)?;
    let logs = ed.run(until)?;
    let telemetry = ed.telemetry();
    Ok(SimulationRun {
        seed: ed.seed(),
        until,
        arrivals: telemetry.total_arrivals(),
        completed_patients: telemetry.completed_patients.len(),
        logs,
    })
}

/// Run `params.replications` independent replications in parallel.
///
/// Results come back in replication order regardless of scheduling. The first
/// failing replication fails the whole batch.
pub fn run_batch(config: &EdConfig, params: &AnalysisParams) -> Result<Batch, AnalysisError> {
    params.validate()?;
    config.validate()?;

    let until = params.horizon();
    let total = params.replications;
    let pb = if params.show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = params.num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;

    log::info!(
        "running {total} replications of {until} time units on {} threads",
        pool.current_num_threads()
    );

    let pb_clone = pb.clone();
    let results: Vec<Result<Replication, AnalysisError>> = pool.install(|| {
        (0..total)
            .into_par_iter()
            .map(|index| {
                let seed = params.seed_for(index).unwrap_or_else(rand::random);
                let run = run_simulation(config, until, Some(seed)).map_err(|source| {
                    AnalysisError::Replication {
                        index,
                        seed,
                        source,
                    }
                })?;
                log::debug!(
                    "replication {index} (seed {seed}): {} arrivals, {} completed",
                    run.arrivals,
                    run.completed_patients
                );
                let binned = run.bin();
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                Ok(Replication { index, run, binned })
            })
            .collect()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    let replications = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    let queue: Vec<&[BinnedSample]> = replications
        .iter()
        .map(|r| r.binned.queue_length.as_slice())
        .collect();
    let busy: Vec<&[BinnedSample]> = replications
        .iter()
        .map(|r| r.binned.busy_staff.as_slice())
        .collect();
    let queue_moving_average = moving_averages(&queue, &params.moving_average_windows);
    let busy_moving_average = moving_averages(&busy, &params.moving_average_windows);

    Ok(Batch {
        replications,
        queue_moving_average,
        busy_moving_average,
    })
}
